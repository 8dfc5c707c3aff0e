use serde::{Deserialize, Serialize};

/// Broadcast channel tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Per-subscriber buffer. A subscriber that falls further behind
    /// skips messages (valid range: 1-65536).
    pub capacity: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}
