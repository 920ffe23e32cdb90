//! Application constants
//!
//! Centralized location for the protocol and configuration constants shared by
//! the core and infrastructure crates.

// HTTP protocol
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;

// Backend endpoints
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
pub const CURRENT_USER_PATH: &str = "/users/me";
pub const REFRESH_TOKEN_FIELD: &str = "refresh_token";

// Client behaviour
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1;
pub const DEFAULT_USER_AGENT: &str = concat!("devconsole/", env!("CARGO_PKG_VERSION"));

// Navigation
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

// Credential storage
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "DevConsole.api";
pub const DEFAULT_KEYCHAIN_ACCOUNT: &str = "main";
pub const DEFAULT_CREDENTIAL_FILE: &str = "credentials.json";

// Envelope convention used by some console endpoints
pub const ENVELOPE_SUCCESS_CODE: i64 = 200;
pub const ENVELOPE_SESSION_EXPIRED_CODE: i64 = 401;

// Logging
pub const DEFAULT_LOG_FILTER: &str = "info";
