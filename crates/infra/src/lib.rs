//! # DevConsole Infrastructure
//!
//! Infrastructure implementations of the core session ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP transport
//! - Credential stores (memory, JSON file, platform keychain)
//! - Session teardown (login redirect over a broadcast navigator)
//! - The `ApiClient` facade and authentication endpoints
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `devconsole-core`
//! - Depends on `devconsole-domain` and `devconsole-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod observability;
pub mod session;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder, Envelope, NotFoundAsNone};
pub use credentials::{
    build_credential_store, FileCredentialStore, InMemoryCredentialStore, KeychainCredentialStore,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpTransport};
pub use observability::init_tracing;
pub use session::{BroadcastNavigator, LoginRedirectTerminator, NavigationEvent};
