//! Tests for TOML config loading, creation, and path resolution.

use super::*;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    match load_from_path(&missing) {
        Err(tether_common::ConfigError::FileNotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[hub]
url = "ws://127.0.0.1:9100"
port = 9100

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.hub.url, "ws://127.0.0.1:9100");
    assert_eq!(config.hub.port, 9100);
    assert_eq!(config.logging.level, crate::schema::LogLevel::Debug);
    // Defaults preserved
    assert_eq!(config.channel.capacity, 256);
    assert!(config.satellite.launch);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, tether_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_is_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[channel]\ncapacity = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.channel.capacity, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tether").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.hub.port, 7878);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::TetherConfig;

    let config: TetherConfig = toml::from_str(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_paths_are_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("tether"));
        assert!(path_str.ends_with("config.toml"));
    }
    if let Some(path) = default_mirror_path() {
        assert!(path.ends_with("tether/window-mirror.json"));
    }
}
