//! # DevConsole Domain
//!
//! Data types shared by every layer of the console API client.
//!
//! This crate contains:
//! - Session credentials and token payloads
//! - Request specifications and transport-level request/response shapes
//! - Error types and Result definitions
//! - Configuration structures
//! - Protocol constants
//!
//! ## Architecture
//! - No dependencies on other DevConsole crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
