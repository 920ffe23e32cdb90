//! Error conversions from third-party crates into domain errors

mod conversions;

pub use conversions::{transport_error, InfraError};
