use serde::{Deserialize, Serialize};

/// Satellite window behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteConfig {
    /// Spawn a satellite process when a window is popped out.
    pub launch: bool,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self { launch: true }
    }
}
