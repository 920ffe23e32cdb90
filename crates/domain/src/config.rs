//! Configuration structures
//!
//! Loading (environment, files) lives in the infrastructure crate; this module
//! only defines the shapes, their defaults, and validation.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CREDENTIAL_FILE, DEFAULT_KEYCHAIN_ACCOUNT, DEFAULT_KEYCHAIN_SERVICE,
    DEFAULT_LOGIN_PATH, DEFAULT_LOGIN_ROUTE, DEFAULT_LOG_FILTER, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_REFRESH_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::errors::{ConsoleError, Result};
use crate::impl_wire_conversions;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub credentials: CredentialStoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub refresh_path: String,
    pub login_path: String,
    /// Route the console navigates to when a session is torn down
    pub login_route: String,
    pub user_agent: String,
    /// Transport attempts per exchange (connection failures only)
    pub max_attempts: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Where credentials are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    #[default]
    Memory,
    File,
    Keychain,
}

impl_wire_conversions!(CredentialBackend {
    Memory => "memory",
    File => "file",
    Keychain => "keychain",
});

/// Credential store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialStoreConfig {
    pub backend: CredentialBackend,
    /// File path for the `file` backend
    pub path: String,
    /// Keychain service for the `keychain` backend
    pub service_name: String,
    /// Keychain account for the `keychain` backend
    pub account: String,
}

impl Default for CredentialStoreConfig {
    fn default() -> Self {
        Self {
            backend: CredentialBackend::Memory,
            path: DEFAULT_CREDENTIAL_FILE.to_string(),
            service_name: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            account: DEFAULT_KEYCHAIN_ACCOUNT.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, e.g. `info,devconsole_core=debug`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), json: false }
    }
}

impl ConsoleConfig {
    /// Check invariants that serde cannot express
    ///
    /// # Errors
    /// Returns `ConsoleError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;

        if self.credentials.backend == CredentialBackend::File
            && self.credentials.path.trim().is_empty()
        {
            return Err(ConsoleError::Config("credentials.path must not be empty".into()));
        }

        Ok(())
    }
}

impl ApiConfig {
    /// # Errors
    /// Returns `ConsoleError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ConsoleError::Config("api.base_url must not be empty".into()));
        }
        let parsed = Url::parse(base).map_err(|e| {
            ConsoleError::Config(format!("api.base_url is not a valid URL ({e}): {base}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConsoleError::Config(format!(
                "api.base_url must be an http(s) URL, got {base}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConsoleError::Config("api.timeout_secs must be greater than 0".into()));
        }
        if self.max_attempts == 0 {
            return Err(ConsoleError::Config("api.max_attempts must be at least 1".into()));
        }
        for (field, value) in [
            ("api.refresh_path", &self.refresh_path),
            ("api.login_path", &self.login_path),
            ("api.login_route", &self.login_route),
        ] {
            if !value.starts_with('/') {
                return Err(ConsoleError::Config(format!("{field} must start with '/'")));
            }
        }
        Ok(())
    }
}
