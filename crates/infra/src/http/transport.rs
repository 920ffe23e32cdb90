//! reqwest-backed [`Transport`]

use async_trait::async_trait;
use devconsole_core::Transport;
use devconsole_domain::{ApiError, ConsoleError, HttpMethod, HttpResponse, RequestBody, TransportRequest};
use reqwest::Method;
use tracing::trace;

use super::client::HttpClient;
use crate::errors::transport_error;

/// Performs one HTTP exchange per [`Transport::execute`] call
#[derive(Clone)]
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Transport over a default [`HttpClient`]
    ///
    /// # Errors
    /// Propagates client construction failures.
    pub fn with_defaults() -> Result<Self, ConsoleError> {
        Ok(Self::new(HttpClient::new()?))
    }
}

const fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.client.request(to_reqwest(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = self.client.send(builder).await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(&err, self.client.timeout()))?
            .to_vec();

        trace!(status, bytes = body.len(), "response body read");
        Ok(HttpResponse { status, headers, body })
    }
}
