//! Error types used throughout the application

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::STATUS_NOT_FOUND;

/// General error type for configuration and storage operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for configuration and storage operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Categories of API errors, used for logging and caller-side policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Network unreachable, timeouts: never routed through refresh
    Transport,
    /// 401 surfaced to the caller (retry already spent or refresh exchange)
    Authentication,
    /// Ordinary non-2xx responses other than 401
    Http,
    /// Session-level failures: refresh failed, session torn down
    Session,
    /// Local failures: decoding, envelope codes, request construction
    Client,
    /// Configuration and credential storage problems
    Config,
}

/// Errors surfaced by the request pipeline
///
/// The type is `Clone` because a single refresh failure is delivered to every
/// request that was queued behind it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Unauthorized: {url} returned 401{}", fmt_body(.body))]
    Unauthorized { url: String, body: String },

    #[error("HTTP error: {url} returned status {status}{}", fmt_body(.body))]
    Http { status: u16, url: String, body: String },

    #[error("Token refresh failed: {0}")]
    RefreshFailed(Box<ApiError>),

    #[error("Session closed before the request could be resumed")]
    SessionClosed,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request rejected with code {code}: {message}")]
    Envelope { code: i64, message: String },

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

fn fmt_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

impl ApiError {
    /// Get the error category for this error
    #[must_use]
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Transport,
            Self::Unauthorized { .. } => ApiErrorCategory::Authentication,
            Self::Http { .. } => ApiErrorCategory::Http,
            Self::RefreshFailed(_) | Self::SessionClosed => ApiErrorCategory::Session,
            Self::Decode(_) | Self::Envelope { .. } | Self::InvalidRequest(_) => {
                ApiErrorCategory::Client
            }
            Self::Storage(_) | Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// HTTP status carried by this error, if the server produced one
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(crate::constants::STATUS_UNAUTHORIZED),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is the backend's "unauthorized" signal
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether the server answered 404
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status == STATUS_NOT_FOUND)
    }

    /// Stable label suitable for structured logging
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Http { .. } => "http",
            Self::RefreshFailed(_) => "refresh_failed",
            Self::SessionClosed => "session_closed",
            Self::Decode(_) => "decode",
            Self::Envelope { .. } => "envelope",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl From<ConsoleError> for ApiError {
    fn from(err: ConsoleError) -> Self {
        match err {
            ConsoleError::Config(message) => Self::Config(message),
            ConsoleError::Storage(message) | ConsoleError::Internal(message) => {
                Self::Storage(message)
            }
            ConsoleError::Serialization(message) => Self::Decode(message),
        }
    }
}
