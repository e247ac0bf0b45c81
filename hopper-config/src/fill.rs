use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FillConfig {
    /// Probability that a slot is passed over during one sweep of the container.
    pub skip_chance: f64,
    /// Sweeps allowed before a fill gives up with an overflow error.
    pub max_sweeps: u32,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            skip_chance: 0.75,
            max_sweeps: 100_000,
        }
    }
}
