//! Port interfaces for the authenticated request pipeline
//!
//! These traits define the boundaries between the request/refresh logic and
//! the infrastructure that stores credentials, moves bytes, and navigates the
//! console.

use async_trait::async_trait;
use devconsole_domain::{ApiError, Credential, HttpResponse, Result, TransportRequest};

/// Persisted credential storage
///
/// Updates are whole-value replacements; implementations never expose a
/// half-written credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current credential, `None` when signed out
    async fn get(&self) -> Result<Option<Credential>>;

    /// Atomically replace the stored credential
    async fn set(&self, credential: Credential) -> Result<()>;

    /// Remove the stored credential (idempotent)
    async fn clear(&self) -> Result<()>;
}

/// A single HTTP exchange
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status. `Err` is reserved for transport-level failures
/// (`ApiError::Network`, `ApiError::Timeout`, `ApiError::InvalidRequest`).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> std::result::Result<HttpResponse, ApiError>;
}

/// Tears down the session after an unrecoverable refresh failure
#[async_trait]
pub trait SessionTerminator: Send + Sync {
    /// Clear credentials and leave authenticated views
    async fn terminate(&self);
}

/// Navigation primitive used by the session terminator
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}
