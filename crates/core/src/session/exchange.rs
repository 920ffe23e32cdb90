//! Single-shot relay between a [`RequestSpec`] and a [`Transport`]
//!
//! `Exchange` resolves a spec against the base URL, attaches the bearer token
//! it is given, performs exactly one transport call, and classifies the
//! status. It never refreshes and never retries; those decisions belong to the
//! dispatcher and the refresh coordinator.

use std::sync::Arc;

use devconsole_domain::constants::{
    AUTHORIZATION_HEADER, CONTENT_TYPE_HEADER, STATUS_UNAUTHORIZED,
};
use devconsole_domain::{bearer, ApiError, HttpResponse, RequestBody, RequestSpec, TransportRequest};
use tracing::debug;
use url::Url;

use super::ports::Transport;

/// Base URL plus the transport used to reach it
pub struct Exchange {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl Exchange {
    /// Create an exchange rooted at `base_url` (a trailing `/` is ignored)
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { transport, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the transport request for `spec`.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` if the joined URL does not parse.
    pub fn resolve(
        &self,
        spec: &RequestSpec,
        access_token: Option<&str>,
    ) -> Result<TransportRequest, ApiError> {
        let joined = if spec.path.starts_with('/') {
            format!("{}{}", self.base_url, spec.path)
        } else {
            format!("{}/{}", self.base_url, spec.path)
        };

        let mut url = Url::parse(&joined)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid URL {joined}: {e}")))?;
        if !spec.query.is_empty() {
            url.query_pairs_mut().extend_pairs(spec.query.iter());
        }

        let mut headers = spec.headers.clone();
        if let Some(token) = access_token {
            headers.retain(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER));
            headers.push((AUTHORIZATION_HEADER.to_string(), bearer(token)));
        }
        if matches!(spec.body, RequestBody::Json(_))
            && !headers.iter().any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER))
        {
            headers.push((CONTENT_TYPE_HEADER.to_string(), "application/json".to_string()));
        }

        Ok(TransportRequest { method: spec.method, url: url.into(), headers, body: spec.body.clone() })
    }

    /// Perform exactly one exchange for `spec`.
    ///
    /// Success statuses resolve unchanged; 401 becomes
    /// `ApiError::Unauthorized`, every other non-2xx `ApiError::Http`.
    /// Transport failures pass through untouched.
    ///
    /// The transport is invoked before the first suspension point, so callers
    /// that poll several of these futures in order initiate them in order.
    ///
    /// # Errors
    /// See above.
    pub async fn send_once(
        &self,
        spec: &RequestSpec,
        access_token: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.resolve(spec, access_token)?;
        let url = request.url.clone();
        let method = request.method;

        let response = self.transport.execute(request).await?;
        debug!(%method, %url, status = response.status, "exchange completed");

        classify(response, url)
    }
}

fn classify(response: HttpResponse, url: String) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }

    let body = response.text();
    if response.status == STATUS_UNAUTHORIZED {
        Err(ApiError::Unauthorized { url, body })
    } else {
        Err(ApiError::Http { status: response.status, url, body })
    }
}
