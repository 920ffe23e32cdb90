//! Console API client
//!
//! [`ApiClient`] is the only entry point callers need: it owns the request
//! dispatcher (and therefore the refresh coordinator) for one session and
//! offers typed helpers on top of it.
//!
//! # Architecture
//!
//! - Every request, typed or raw, goes through `RequestDispatcher`
//! - Login is sent anonymously and never enters the refresh path
//! - Credentials live in whichever `CredentialStore` the builder was given
//! - Response interpretation (404 as absence, `{code, message, data}`
//!   envelopes) is opt-in per call site

pub mod auth;
pub mod client;
pub mod interpret;

pub use client::{ApiClient, ApiClientBuilder};
pub use interpret::{Envelope, NotFoundAsNone};
