//! Where config and mirror files live.

use std::path::{Path, PathBuf};

use tether_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "tether";
const CONFIG_FILE: &str = "config.toml";
const MIRROR_FILE: &str = "window-mirror.json";

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("no config directory on this platform".into()))
}

/// Mirror file shared by every window process of this user.
pub fn default_mirror_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(MIRROR_FILE))
}

/// Write the commented default config to `path`, creating parents.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_err = |e: std::io::Error| {
        ConfigError::ParseError(format!("cannot write {}: {e}", path.display()))
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, default_config_toml()).map_err(write_err)?;

    info!(path = %path.display(), "Wrote default config");
    Ok(())
}
