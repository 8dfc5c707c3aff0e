use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persistent mirror location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Override for the mirror file. Defaults to
    /// `<data_dir>/tether/window-mirror.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}
