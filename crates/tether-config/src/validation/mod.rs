//! Configuration validation.
//!
//! Each check pushes a message into a shared list; `validate` folds them
//! into a single `ConfigError`.

mod helpers;

use crate::schema::TetherConfig;
use tether_common::ConfigError;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TetherConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_hub(&mut errors, config);
    validate_range(
        &mut errors,
        "channel.capacity",
        config.channel.capacity,
        1,
        65536,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_hub(errors: &mut Vec<String>, config: &TetherConfig) {
    let url = config.hub.url.trim();
    if !(url.starts_with("ws://") || url.starts_with("wss://")) {
        errors.push(format!("hub.url = {url:?} must use ws:// or wss://"));
    }
    validate_range(errors, "hub.port", u32::from(config.hub.port), 1, 65535);
    validate_range(
        errors,
        "hub.connect_timeout",
        config.hub.connect_timeout,
        1,
        60,
    );
}
