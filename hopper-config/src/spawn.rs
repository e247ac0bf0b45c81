use serde::{Deserialize, Serialize};

/// Controls the outward push given to items spawned into the world.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    /// Magnitude of the impulse applied to every spawned item.
    pub impulse: f64,
    pub min_pitch: f64,
    pub max_pitch: f64,
    pub min_yaw: f64,
    pub max_yaw: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            impulse: 0.05,
            // Negative pitch looks up, so items pop upwards and outwards
            min_pitch: -90.0,
            max_pitch: -30.0,
            min_yaw: -180.0,
            max_yaw: 179.0,
        }
    }
}
