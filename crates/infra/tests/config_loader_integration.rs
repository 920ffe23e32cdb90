//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a client from it.

use devconsole_domain::{ConsoleError, CredentialBackend};
use devconsole_infra::{config, ApiClient};
use tempfile::TempDir;

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("devconsole.toml");
    std::fs::write(
        &path,
        r#"
[api]
base_url = "https://console.example.com/api/v1"
timeout_secs = 20
refresh_path = "/session/refresh"

[credentials]
backend = "file"
path = "/var/lib/devconsole/credentials.json"

[logging]
filter = "info,devconsole_core=debug"
json = true
"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("config should load");

    assert_eq!(config.api.base_url, "https://console.example.com/api/v1");
    assert_eq!(config.api.timeout_secs, 20);
    assert_eq!(config.api.refresh_path, "/session/refresh");
    assert_eq!(config.api.login_path, "/auth/login");
    assert_eq!(config.credentials.backend, CredentialBackend::File);
    assert!(config.logging.json);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("devconsole.toml");
    std::fs::write(&path, "[api\nbase_url = 1").expect("Failed to write config");

    let result = config::load_from_file(Some(path));
    assert!(matches!(result, Err(ConsoleError::Config(_))));
}

#[test]
fn test_client_from_loaded_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("devconsole.json");
    let credentials = dir.path().join("credentials.json");
    std::fs::write(
        &path,
        serde_json::json!({
            "api": {"base_url": "http://127.0.0.1:9/api/v1"},
            "credentials": {"backend": "file", "path": credentials}
        })
        .to_string(),
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("config should load");
    let client = ApiClient::from_config(&config).expect("client should build");

    assert_eq!(client.dispatcher().base_url(), "http://127.0.0.1:9/api/v1");
}

#[test]
fn test_rejects_relative_refresh_path() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("devconsole.json");
    std::fs::write(&path, r#"{"api": {"refresh_path": "auth/refresh"}}"#)
        .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("config should parse");
    assert!(ApiClient::from_config(&config).is_err());
}
