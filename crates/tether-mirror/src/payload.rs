use serde::{Deserialize, Serialize};
use tether_common::RegistrySnapshot;

/// Versioned mirror payload. `version` increases on every registry write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorPayload {
    pub version: u64,
    pub windows: RegistrySnapshot,
}

impl MirrorPayload {
    pub fn new(version: u64, windows: RegistrySnapshot) -> Self {
        Self { version, windows }
    }
}
