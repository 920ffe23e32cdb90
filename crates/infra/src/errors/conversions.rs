//! Conversions from external infrastructure errors into domain errors.

use std::time::Duration;

use devconsole_domain::{ApiError, ConsoleError};
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ConsoleError);

impl From<InfraError> for ConsoleError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<InfraError> for ApiError {
    fn from(value: InfraError) -> Self {
        Self::from(value.0)
    }
}

impl From<ConsoleError> for InfraError {
    fn from(value: ConsoleError) -> Self {
        Self(value)
    }
}

trait IntoConsoleError {
    fn into_console(self) -> ConsoleError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → ConsoleError */
/* -------------------------------------------------------------------------- */

impl IntoConsoleError for KeyringError {
    fn into_console(self) -> ConsoleError {
        let description = self.to_string();

        match self {
            KeyringError::NoEntry => ConsoleError::Storage("keychain entry not found".into()),
            KeyringError::BadEncoding(_) => {
                ConsoleError::Storage("credential in keychain is not valid UTF-8".into())
            }
            KeyringError::TooLong(name, limit) => ConsoleError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            KeyringError::Invalid(attr, reason) => {
                ConsoleError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            KeyringError::Ambiguous(entries) => ConsoleError::Storage(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            KeyringError::PlatformFailure(err) => {
                ConsoleError::Storage(format!("keychain platform error: {err}"))
            }
            KeyringError::NoStorageAccess(err) => {
                ConsoleError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => ConsoleError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        Self(value.into_console())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / serde_json::Error / toml::de::Error → ConsoleError */
/* -------------------------------------------------------------------------- */

impl IntoConsoleError for std::io::Error {
    fn into_console(self) -> ConsoleError {
        match self.kind() {
            std::io::ErrorKind::PermissionDenied => {
                ConsoleError::Storage(format!("permission denied: {self}"))
            }
            _ => ConsoleError::Storage(format!("I/O failure: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(value.into_console())
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(ConsoleError::Serialization(format!("invalid JSON: {value}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        Self(ConsoleError::Config(format!("Invalid TOML format: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

/// Map a reqwest failure into the transport error surfaced to callers.
///
/// Only connection-level failures reach this point; HTTP statuses are
/// classified by the exchange, never here.
#[must_use]
pub fn transport_error(err: &HttpError, timeout: Duration) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(timeout);
    }

    if err.is_connect() {
        return ApiError::Network(format!("HTTP connection failure: {err}"));
    }

    if err.is_builder() {
        return ApiError::InvalidRequest(format!("HTTP request could not be built: {err}"));
    }

    if err.is_body() || err.is_decode() {
        return ApiError::Network(format!("HTTP body transfer failed: {err}"));
    }

    ApiError::Network(err.to_string())
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
