//! Integration tests for msgcat-config crate.

use msgcat_config::{ConfigLoader, ServerConfig};
use tempfile::TempDir;

#[test]
fn test_explicit_path_wins() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yml");
    std::fs::write(&path, "catalog_index: data/index.json\nbody_limit_bytes: 2048\n").unwrap();

    let config = ConfigLoader::load(Some(&path)).unwrap();
    assert_eq!(config.catalog_index, "data/index.json");
    assert_eq!(config.body_limit_bytes, 2048);
    assert_eq!(config.bind_address, ServerConfig::default().bind_address);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");
    assert!(ConfigLoader::load(Some(&path)).is_err());
}

#[test]
fn test_config_round_trips_through_yaml() {
    let config = ServerConfig::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: ServerConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_config_error_converts_to_app_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = ConfigLoader::load(Some(&path)).unwrap_err();

    let app_error: msgcat_common::AppError = err.into();
    assert!(app_error.to_string().starts_with("Configuration error"));
}
