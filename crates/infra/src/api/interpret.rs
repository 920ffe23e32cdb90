//! Caller-side response interpretation

use devconsole_domain::constants::{ENVELOPE_SESSION_EXPIRED_CODE, ENVELOPE_SUCCESS_CODE};
use devconsole_domain::ApiError;
use serde::{Deserialize, Serialize};

/// Treat a 404 as "no such resource" rather than a failure.
///
/// Useful for polling endpoints that answer 404 until a result exists.
pub trait NotFoundAsNone<T> {
    /// # Errors
    /// Every error other than a 404 is passed through.
    fn not_found_as_none(self) -> Result<Option<T>, ApiError>;
}

impl<T> NotFoundAsNone<T> for Result<T, ApiError> {
    fn not_found_as_none(self) -> Result<Option<T>, ApiError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// `{ code, message, data }` wrapper used by some console endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == ENVELOPE_SUCCESS_CODE
    }

    /// The backend reports an expired session inside the envelope
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        self.code == ENVELOPE_SESSION_EXPIRED_CODE
    }

    /// Unwrap the payload of a successful envelope
    ///
    /// # Errors
    /// `ApiError::Envelope` when `code` is not the success code,
    /// `ApiError::Decode` when a successful envelope carries no data.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Envelope { code: self.code, message: self.message });
        }
        self.data.ok_or_else(|| ApiError::Decode("envelope has no data".into()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn not_found_becomes_none() {
        let missing: Result<u32, ApiError> =
            Err(ApiError::Http { status: 404, url: "/jobs/1".into(), body: String::new() });
        assert_eq!(missing.not_found_as_none(), Ok(None));

        let found: Result<u32, ApiError> = Ok(3);
        assert_eq!(found.not_found_as_none(), Ok(Some(3)));
    }

    #[test]
    fn other_errors_pass_through() {
        let forbidden: Result<u32, ApiError> =
            Err(ApiError::Http { status: 403, url: "/jobs/1".into(), body: String::new() });
        assert_eq!(forbidden.clone().not_found_as_none(), Err(forbidden.unwrap_err()));
    }

    #[test]
    fn envelope_unwraps_success_and_reports_failure() {
        let ok: Envelope<Vec<u32>> =
            serde_json::from_value(json!({"code": 200, "message": "ok", "data": [1, 2]})).unwrap();
        assert_eq!(ok.into_data().unwrap(), vec![1, 2]);

        let failed: Envelope<Vec<u32>> =
            serde_json::from_value(json!({"code": 4001, "message": "device offline"})).unwrap();
        assert_eq!(
            failed.into_data().unwrap_err(),
            ApiError::Envelope { code: 4001, message: "device offline".into() }
        );
    }

    #[test]
    fn envelope_401_reads_as_session_expiry() {
        let expired: Envelope<()> =
            serde_json::from_value(json!({"code": 401, "message": "token expired"})).unwrap();
        assert!(expired.is_session_expired());
        assert!(!expired.is_success());
    }
}
