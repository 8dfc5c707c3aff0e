//! Configuration schema types for tether.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod channel;
mod hub;
mod logging;
mod mirror;
mod satellite;

pub use channel::*;
pub use hub::*;
pub use logging::*;
pub use mirror::*;
pub use satellite::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration shared by the main window, satellites, and the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct TetherConfig {
    pub hub: HubConfig,
    pub channel: ChannelConfig,
    pub mirror: MirrorConfig,
    pub satellite: SatelliteConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
