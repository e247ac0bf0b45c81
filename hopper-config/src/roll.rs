use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RollConfig {
    /// How deep nested loot table references may go before a roll is aborted.
    pub max_depth: u32,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}
