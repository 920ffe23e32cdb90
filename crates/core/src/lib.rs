//! # DevConsole Core
//!
//! Request sequencing for the console API client - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces (credential storage, transport, session teardown,
//!   navigation)
//! - The request dispatcher
//! - The single-flight token refresh coordinator
//!
//! ## Architecture Principles
//! - Only depends on `devconsole-domain`
//! - No HTTP client, keychain, or filesystem code
//! - All external dependencies via traits
//! - Deterministic, testable sequencing

pub mod session;

pub use session::{
    CredentialStore, Exchange, Navigator, PendingRequest, RefreshCoordinator, RefreshState,
    RequestDispatcher, SessionTerminator, Transport,
};
