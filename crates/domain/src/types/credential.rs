//! Session credentials
//!
//! A [`Credential`] is always replaced as a whole: the access token and the
//! refresh token that rotated with it never exist separately.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::BEARER_PREFIX;

/// Access/refresh token pair for one authenticated session
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
}

impl Credential {
    /// Create a credential from its two tokens
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: refresh_token.into() }
    }

    /// Value for the `Authorization` header
    #[must_use]
    pub fn bearer(&self) -> String {
        bearer(&self.access_token)
    }
}

// Tokens never reach logs through `{:?}`.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Render a bearer authorization value for an arbitrary token
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}

/// Token payload returned by the login and refresh endpoints
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

impl From<TokenResponse> for Credential {
    fn from(response: TokenResponse) -> Self {
        Self { access_token: response.access_token, refresh_token: response.refresh_token }
    }
}
