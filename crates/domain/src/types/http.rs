//! Request and response shapes exchanged between callers, the dispatcher and
//! the transport.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::impl_wire_conversions;

/// HTTP verbs used by the console API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl_wire_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Put => "PUT",
    Patch => "PATCH",
    Delete => "DELETE",
});

/// Request payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// What a caller asks the dispatcher to send
///
/// Paths are relative to the configured base URL. The bearer header is never
/// part of the spec; the dispatcher attaches the current credential on every
/// attempt so a retried spec never carries a stale token.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    is_refresh: bool,
    anonymous: bool,
}

impl RequestSpec {
    /// Create a spec for `method` on `path`
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            is_refresh: false,
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Attach a JSON body
    #[must_use]
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Attach a form-encoded body
    #[must_use]
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body =
            RequestBody::Form(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append an extra header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Mark this spec as the token refresh exchange.
    ///
    /// A 401 on a refresh exchange is terminal: it is never routed back into
    /// the refresh path.
    #[must_use]
    pub const fn refresh_exchange(mut self) -> Self {
        self.is_refresh = true;
        self
    }

    /// Send without a bearer header and without refresh handling (login).
    #[must_use]
    pub const fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    #[must_use]
    pub const fn is_refresh(&self) -> bool {
        self.is_refresh
    }

    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Whether a 401 on this spec may enter the refresh path
    #[must_use]
    pub const fn refreshable(&self) -> bool {
        !self.is_refresh && !self.anonymous
    }
}

/// Fully resolved request handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl TransportRequest {
    /// Case-insensitive header lookup
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Structured result of one HTTP exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response without headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    /// Create a JSON response
    #[must_use]
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: value.to_string().into_bytes(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Case-insensitive header lookup
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body as (lossy) UTF-8 text
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    ///
    /// 204/205 responses and empty bodies deserialize from `null`, so `()` and
    /// `Option<T>` targets succeed on them.
    ///
    /// # Errors
    /// Returns `ApiError::Decode` when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.status == 204 || self.status == 205 || self.body.is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Decode(format!(
                    "empty response ({}) cannot be deserialized into the requested type",
                    self.status
                ))
            });
        }

        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::Decode(format!("failed to parse response: {e}")))
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
}
