use log::warn;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub mod fill;
pub mod logging;
pub mod roll;
pub mod spawn;

pub use fill::FillConfig;
pub use logging::LoggingConfig;
pub use roll::RollConfig;
pub use spawn::SpawnConfig;

const CONFIG_ROOT_FOLDER: &str = "config/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't access configuration at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Couldn't parse configuration at {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the loot engine can be tuned with.
/// The defaults reproduce the stock behavior, so an empty file is a valid configuration.
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LootConfig {
    pub roll: RollConfig,
    pub fill: FillConfig,
    pub spawn: SpawnConfig,
    pub logging: LoggingConfig,
}

impl LootConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: PathBuf::new(),
            message: err.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

pub trait LoadConfiguration {
    /// Reads `<exec_dir>/config/<file>`, writing the defaults there first if the file is missing.
    fn load(exec_dir: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let config_dir = exec_dir.join(CONFIG_ROOT_FOLDER);
        if !config_dir.exists() {
            log::debug!("creating new config root folder");
            fs::create_dir(&config_dir).map_err(|source| ConfigError::Io {
                path: config_dir.clone(),
                source,
            })?;
        }
        let path = config_dir.join(Self::get_path());

        let config = if path.exists() {
            let file_content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;

            toml::from_str(&file_content).map_err(|err| ConfigError::Parse {
                path: path.clone(),
                message: err.message().to_string(),
            })?
        } else {
            let content = Self::default();

            match toml::to_string(&content) {
                Ok(serialized) => {
                    if let Err(err) = fs::write(&path, serialized) {
                        warn!("Couldn't write default config to {:?}. Reason: {}", &path, err);
                    }
                }
                Err(err) => warn!("Couldn't serialize default config. Reason: {}", err),
            }

            content
        };

        config.validate()?;
        Ok(config)
    }

    fn get_path() -> &'static Path;

    fn validate(&self) -> Result<(), ConfigError>;
}

impl LoadConfiguration for LootConfig {
    fn get_path() -> &'static Path {
        Path::new("loot.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.roll.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "roll.max_depth must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.fill.skip_chance) {
            return Err(ConfigError::Invalid(format!(
                "fill.skip_chance must be in [0, 1), got {}",
                self.fill.skip_chance
            )));
        }
        if self.fill.max_sweeps == 0 {
            return Err(ConfigError::Invalid(
                "fill.max_sweeps must be at least 1".to_string(),
            ));
        }
        let spawn = &self.spawn;
        if !spawn.impulse.is_finite() || spawn.impulse < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spawn.impulse must be a non-negative number, got {}",
                spawn.impulse
            )));
        }
        if spawn.min_pitch > spawn.max_pitch || spawn.min_yaw > spawn.max_yaw {
            return Err(ConfigError::Invalid(
                "spawn pitch and yaw ranges must have min <= max".to_string(),
            ));
        }
        Ok(())
    }
}
