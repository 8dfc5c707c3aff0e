//! tether configuration system.
//!
//! TOML-based configuration shared by the main window, satellite
//! windows, and the broadcast hub. All sections have defaults so
//! partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{TetherConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::default_mirror_path;

use std::path::{Path, PathBuf};

use tether_common::ConfigError;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<TetherConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path when given, else the default path.
pub fn load_config_from(path: Option<&Path>) -> Result<TetherConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = toml_loader::load_from_path(path)?;
            validation::validate(&config)?;
            Ok(config)
        }
        None => load_config(),
    }
}

/// Resolve the mirror file: explicit config override, else the data dir.
pub fn mirror_path(config: &TetherConfig) -> Option<PathBuf> {
    config.mirror.path.clone().or_else(default_mirror_path)
}
