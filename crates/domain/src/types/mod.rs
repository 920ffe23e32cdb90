//! Domain types and models

pub mod credential;
pub mod http;
pub mod user;

pub use credential::{bearer, Credential, TokenResponse};
pub use http::{HttpMethod, HttpResponse, RequestBody, RequestSpec, TransportRequest};
pub use user::UserInfo;
