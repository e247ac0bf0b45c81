use std::{io, path::PathBuf};

use hopper_config::ConfigError;
use hopper_world::LootError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Loot(#[from] LootError),
    #[error("Couldn't read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Can't name a loot table after {0:?}")]
    TableName(PathBuf),
}
