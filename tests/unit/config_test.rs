//! Unit tests for configuration module

use inventory_web::config::{FeedbackMode, LogFormat, Settings, StorageBackend};
use std::fs;

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.storage.backend, StorageBackend::Sqlite);
    assert_eq!(settings.storage.path, "./data/items.db");
    assert!(!settings.storage.seed_on_start);
    assert_eq!(settings.session.cookie_name, "inventory.sid");
    assert_eq!(settings.ui.feedback, FeedbackMode::Flash);
    assert_eq!(settings.logging.format, LogFormat::Json);
    assert!(settings.auth.jwt_secret.is_none());
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_validation_invalid_port() {
    let mut settings = Settings::default();
    settings.server.port = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_empty_storage_path() {
    let mut settings = Settings::default();
    settings.storage.path = "  ".to_string();

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_document_in_memory() {
    let mut settings = Settings::default();
    settings.storage.backend = StorageBackend::Document;
    settings.storage.path = ":memory:".to_string();
    assert!(settings.validate().is_err());

    settings.storage.backend = StorageBackend::Sqlite;
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_validation_session_and_auth() {
    let mut settings = Settings::default();
    settings.session.cookie_name = String::new();
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.auth.token_ttl_minutes = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn test_bind_address() {
    let mut settings = Settings::default();
    settings.server.host = "127.0.0.1".to_string();
    settings.server.port = 8080;

    assert_eq!(settings.bind_address(), "127.0.0.1:8080");
}

// Environment overrides are process wide, so file loading and overrides share one test
#[test]
fn test_load_from_yaml_file_with_env_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.yaml");
    fs::write(
        &path,
        r#"
server:
  port: 4100
storage:
  backend: document
  path: /tmp/items.redb
ui:
  feedback: inline
logging:
  level: debug
  format: compact
"#,
    )
    .unwrap();

    let settings = Settings::load_from_path(&path).unwrap();
    assert_eq!(settings.server.port, 4100);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.storage.backend, StorageBackend::Document);
    assert_eq!(settings.storage.path, "/tmp/items.redb");
    assert_eq!(settings.ui.feedback, FeedbackMode::Inline);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert_eq!(settings.session.cookie_name, "inventory.sid");

    std::env::set_var("INVENTORY__SERVER__PORT", "4200");
    let overridden = Settings::load_from_path(&path);
    std::env::remove_var("INVENTORY__SERVER__PORT");
    assert_eq!(overridden.unwrap().server.port, 4200);

    let missing = Settings::load_from_path(dir.path().join("absent.yaml")).unwrap();
    assert_eq!(missing.server.port, 3000);
}

#[test]
fn test_load_rejects_invalid_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.yaml");
    fs::write(&path, "auth:\n  token_ttl_minutes: -5\n").unwrap();

    assert!(Settings::load_from_path(&path).is_err());
}
