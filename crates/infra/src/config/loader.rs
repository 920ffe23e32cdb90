//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads an optional `.env` file into the process environment
//! 2. Attempts to load from environment variables
//! 3. If `DEVCONSOLE_API_BASE_URL` is absent, falls back to loading from file
//! 4. If no file exists either, uses the built-in defaults
//! 5. The result is validated before it is returned
//!
//! ## Environment Variables
//! - `DEVCONSOLE_API_BASE_URL`: API base URL (required for env loading)
//! - `DEVCONSOLE_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `DEVCONSOLE_REFRESH_PATH`: Token refresh endpoint path
//! - `DEVCONSOLE_LOGIN_PATH`: Password login endpoint path
//! - `DEVCONSOLE_CREDENTIAL_BACKEND`: `memory`, `file` or `keychain`
//! - `DEVCONSOLE_CREDENTIAL_PATH`: Credential file for the `file` backend
//! - `DEVCONSOLE_LOG_FILTER`: `tracing` filter directive
//! - `DEVCONSOLE_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./devconsole.toml`, `./devconsole.json`, `./config.toml`,
//!    `./config.json` (current working directory)
//! 2. The same names in the parent and grandparent directories

use std::path::{Path, PathBuf};
use std::str::FromStr;

use devconsole_domain::{ConsoleConfig, ConsoleError, CredentialBackend, Result};

use crate::errors::InfraError;

const BASE_URL_VAR: &str = "DEVCONSOLE_API_BASE_URL";
const CONFIG_FILE_NAMES: [&str; 4] =
    ["devconsole.toml", "devconsole.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `ConsoleError::Config` if a source exists but is malformed, or if
/// the resulting configuration fails validation.
pub fn load() -> Result<ConsoleConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = if std::env::var_os(BASE_URL_VAR).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        config
    } else if let Some(path) = probe_config_paths() {
        load_from_file(Some(path))?
    } else {
        tracing::info!("No configuration source found, using defaults");
        ConsoleConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `DEVCONSOLE_API_BASE_URL` is required; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `ConsoleError::Config` if the base URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<ConsoleConfig> {
    let mut config = ConsoleConfig::default();

    config.api.base_url = env_var(BASE_URL_VAR)?;
    if let Some(timeout) = env_parse::<u64>("DEVCONSOLE_API_TIMEOUT_SECS")? {
        config.api.timeout_secs = timeout;
    }
    if let Some(path) = env_opt("DEVCONSOLE_REFRESH_PATH") {
        config.api.refresh_path = path;
    }
    if let Some(path) = env_opt("DEVCONSOLE_LOGIN_PATH") {
        config.api.login_path = path;
    }

    if let Some(backend) = env_opt("DEVCONSOLE_CREDENTIAL_BACKEND") {
        config.credentials.backend = CredentialBackend::from_str(&backend).map_err(|_| {
            ConsoleError::Config(format!("Invalid credential backend: {backend}"))
        })?;
    }
    if let Some(path) = env_opt("DEVCONSOLE_CREDENTIAL_PATH") {
        config.credentials.path = path;
    }

    if let Some(filter) = env_opt("DEVCONSOLE_LOG_FILTER") {
        config.logging.filter = filter;
    }
    config.logging.json = env_bool("DEVCONSOLE_LOG_JSON", config.logging.json);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ConsoleError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ConsoleConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConsoleError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ConsoleError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ConsoleError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<ConsoleConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConsoleError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ConsoleError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the working directory and its ancestors for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
#[must_use]
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_from(&cwd)
}

fn probe_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(3)
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ConsoleError::Config(format!("Missing required environment variable: {key}"))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConsoleError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
