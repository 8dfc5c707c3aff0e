//! Reading `config.toml` from an explicit path or the platform default.

use std::io::ErrorKind;
use std::path::Path;

use tether_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::TetherConfig;
use crate::validation;

/// Parse the TOML file at `path`.
///
/// Absent fields fall back to their defaults. An out-of-range value is
/// only warned about here; callers that need a valid config run
/// [`validation::validate`] themselves.
pub fn load_from_path(path: &Path) -> Result<TetherConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };

    let config: TetherConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "Config has invalid values: {e}");
    }

    info!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Load `<config_dir>/tether/config.toml`, writing a documented default
/// file on first run.
pub fn load_default() -> Result<TetherConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(TetherConfig::default())
        }
        other => other,
    }
}
