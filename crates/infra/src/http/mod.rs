//! HTTP plumbing: the retrying reqwest wrapper and the `Transport` adapter

pub mod client;
pub mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use transport::HttpTransport;
