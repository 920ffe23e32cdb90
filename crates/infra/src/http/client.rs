use std::time::Duration;

use devconsole_domain::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use devconsole_domain::{ApiError, ConsoleError};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::transport_error;

/// HTTP client with timeout support and connection-level retries.
///
/// Only failures where the request never reached the server are retried.
/// Every HTTP status, including 5xx, is returned to the caller as-is so that
/// one call to [`HttpClient::send`] is one logical exchange.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// Returns `ConsoleError::Config` if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, ConsoleError> {
        Self::builder().build()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder, retrying connection failures.
    ///
    /// # Errors
    /// `ApiError::Timeout` when the configured timeout elapses,
    /// `ApiError::Network` for other transport failures.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                ApiError::InvalidRequest(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request =
                cloned_builder.build().map_err(|err| transport_error(&err, self.timeout))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, %method, %url, %status, "received HTTP response");
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");

                    if attempt + 1 < attempts && should_retry_error(&err) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(transport_error(&err, self.timeout));
                }
            }
        }

        Err(ApiError::Network("http client exhausted retries without producing a result".into()))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = u32::try_from(retry_number.saturating_sub(1).min(8)).unwrap_or(8);
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: String,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: 1,
            base_backoff: Duration::from_millis(200),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub const fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    #[must_use]
    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// # Errors
    /// Returns `ConsoleError::Config` if reqwest rejects the configuration.
    pub fn build(self) -> Result<HttpClient, ConsoleError> {
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).user_agent(self.user_agent).no_proxy();

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| ConsoleError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpClient {
            client,
            timeout: self.timeout,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_connect()
}
