use serde::{Deserialize, Serialize};

/// Where window processes find the local broadcast hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// WebSocket URL that window processes connect to.
    pub url: String,
    /// Port the `tether-hub` binary listens on.
    pub port: u16,
    /// Seconds to wait for the hub before giving up (valid range: 1-60).
    pub connect_timeout: u32,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:7878".into(),
            port: 7878,
            connect_timeout: 5,
        }
    }
}
