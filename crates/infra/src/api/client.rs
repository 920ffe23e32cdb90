//! Session-scoped API client with transparent token refresh
//!
//! Builds one [`RequestDispatcher`] over the configured transport, credential
//! store and session terminator, and exposes typed helpers on top of it.

use std::sync::Arc;
use std::time::Duration;

use devconsole_core::{CredentialStore, Navigator, RequestDispatcher, SessionTerminator, Transport};
use devconsole_domain::{ApiConfig, ApiError, ConsoleConfig, HttpResponse, RequestSpec};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::interpret::Envelope;
use crate::credentials::{build_credential_store, InMemoryCredentialStore};
use crate::http::{HttpClient, HttpTransport};
use crate::session::{BroadcastNavigator, LoginRedirectTerminator, NavigationEvent};

/// API client for one console session
#[derive(Clone)]
pub struct ApiClient {
    pub(super) dispatcher: RequestDispatcher,
    pub(super) config: ApiConfig,
    pub(super) navigator: Arc<dyn Navigator>,
    pub(super) navigation: Option<BroadcastNavigator>,
    terminator: Arc<dyn SessionTerminator>,
}

impl ApiClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Production stack for `config`: reqwest transport, the configured
    /// credential backend, and a login redirect on session termination.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configuration is invalid or the HTTP
    /// client cannot be created.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ApiError> {
        config.validate()?;
        Self::builder()
            .config(config.api.clone())
            .store(build_credential_store(&config.credentials))
            .build()
    }

    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        self.dispatcher.store()
    }

    /// Navigation events published on session teardown and logout.
    ///
    /// `None` when the builder was given a custom navigator.
    #[must_use]
    pub fn subscribe_navigation(&self) -> Option<broadcast::Receiver<NavigationEvent>> {
        self.navigation.as_ref().map(BroadcastNavigator::subscribe)
    }

    /// Send `spec` and return the raw response
    ///
    /// # Errors
    ///
    /// Non-2xx statuses as `ApiError::Http`/`ApiError::Unauthorized`,
    /// transport failures, or `ApiError::RefreshFailed` when the session
    /// could not be renewed.
    pub async fn request(&self, spec: RequestSpec) -> Result<HttpResponse, ApiError> {
        self.dispatcher.dispatch(spec).await
    }

    /// Execute a GET request and decode the JSON response
    ///
    /// # Errors
    ///
    /// Same as [`Self::request`], plus `ApiError::Decode`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(RequestSpec::get(path)).await?.json()
    }

    /// GET with query parameters
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let spec = query.iter().fold(RequestSpec::get(path), |spec, (k, v)| spec.query(*k, *v));
        self.request(spec).await?.json()
    }

    /// # Errors
    ///
    /// Same as [`Self::get`], plus `ApiError::InvalidRequest` when `body`
    /// cannot be serialised.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(RequestSpec::post(path).json(to_json(body)?)).await?.json()
    }

    /// # Errors
    ///
    /// Same as [`Self::post`].
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(RequestSpec::put(path).json(to_json(body)?)).await?.json()
    }

    /// # Errors
    ///
    /// Same as [`Self::post`].
    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(RequestSpec::patch(path).json(to_json(body)?)).await?.json()
    }

    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(RequestSpec::delete(path)).await?.json()
    }

    /// GET an endpoint that wraps its payload in `{code, message, data}`
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`], plus whatever [`Self::accept_envelope`] rejects.
    pub async fn get_enveloped<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.get(path).await?;
        self.accept_envelope(envelope).await
    }

    /// Unwrap an envelope, ending the session when it reports expiry.
    ///
    /// Envelope code 401 arrives inside a 2xx response, so the dispatcher
    /// never sees it; it goes straight to the session terminator instead of
    /// the refresh path.
    ///
    /// # Errors
    ///
    /// `ApiError::Envelope` for any non-success code (after teardown for
    /// 401), `ApiError::Decode` for a success envelope without data.
    pub async fn accept_envelope<T>(&self, envelope: Envelope<T>) -> Result<T, ApiError> {
        if envelope.is_session_expired() {
            warn!(detail = %envelope.message, "envelope reports expired session");
            self.terminator.terminate().await;
        }
        envelope.into_data()
    }
}

fn to_json<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::InvalidRequest(format!("failed to serialise request body: {e}")))
}

/// Builder for API client
///
/// Anything not supplied falls back to the production default derived from
/// the API configuration.
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiConfig>,
    transport: Option<Arc<dyn Transport>>,
    store: Option<Arc<dyn CredentialStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    terminator: Option<Arc<dyn SessionTerminator>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shorthand for overriding only the base URL
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut config = self.config.take().unwrap_or_default();
        config.base_url = base_url.into();
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Replace the default [`LoginRedirectTerminator`]
    #[must_use]
    pub fn terminator(mut self, terminator: Arc<dyn SessionTerminator>) -> Self {
        self.terminator = Some(terminator);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configuration is invalid or the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let client = HttpClient::builder()
                    .timeout(Duration::from_secs(config.timeout_secs))
                    .max_attempts(config.max_attempts)
                    .user_agent(config.user_agent.clone())
                    .build()?;
                Arc::new(HttpTransport::new(client))
            }
        };

        let store = self.store.unwrap_or_else(|| Arc::new(InMemoryCredentialStore::new()));

        let (navigator, navigation) = match self.navigator {
            Some(navigator) => (navigator, None),
            None => {
                let broadcast = BroadcastNavigator::new();
                (Arc::new(broadcast.clone()) as Arc<dyn Navigator>, Some(broadcast))
            }
        };

        let terminator = self.terminator.unwrap_or_else(|| {
            Arc::new(LoginRedirectTerminator::new(
                Arc::clone(&store),
                Arc::clone(&navigator),
                config.login_route.clone(),
            ))
        });

        let dispatcher = RequestDispatcher::new(
            transport,
            store,
            Arc::clone(&terminator),
            config.base_url.clone(),
            config.refresh_path.clone(),
        );

        info!(base_url = %config.base_url, "API client ready");
        debug!(refresh_path = %config.refresh_path, login_path = %config.login_path, "auth endpoints");

        Ok(ApiClient { dispatcher, config, navigator, navigation, terminator })
    }
}

#[cfg(test)]
mod tests {
    use devconsole_domain::Credential;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> ApiClient {
        let store = Arc::new(InMemoryCredentialStore::with_credential(Credential::new("T1", "R1")));
        ApiClient::builder().base_url(server.uri()).store(store).build().unwrap()
    }

    #[tokio::test]
    async fn get_attaches_bearer_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices"))
            .and(query_param("limit", "5"))
            .and(header("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let devices: Vec<serde_json::Value> =
            client.get_with_query("/devices", &[("limit", "5")]).await.unwrap();

        assert_eq!(devices, vec![json!({"id": 1})]);
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/devices"))
            .and(body_json(json!({"name": "edge-01"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created: serde_json::Value =
            client.post("/devices", &json!({"name": "edge-01"})).await.unwrap();

        assert_eq!(created["id"], 9);
    }

    #[tokio::test]
    async fn delete_with_no_content_decodes_unit() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/devices/9"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.delete::<()>("/devices/9").await.unwrap();
    }

    #[tokio::test]
    async fn enveloped_get_unwraps_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 200, "message": "ok", "data": {"state": "done"}})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let job: serde_json::Value = client.get_enveloped("/jobs/7").await.unwrap();

        assert_eq!(job["state"], "done");
        assert!(client.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn envelope_session_expiry_ends_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/7"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": 401, "message": "token expired"})),
            )
            .mount(&server)
            .await;
        Mock::given(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut events = client.subscribe_navigation().unwrap();

        let err = client.get_enveloped::<serde_json::Value>("/jobs/7").await.unwrap_err();

        assert_eq!(err, ApiError::Envelope { code: 401, message: "token expired".into() });
        assert!(!client.is_authenticated().await.unwrap());
        assert_eq!(events.recv().await.unwrap(), NavigationEvent::Redirect { route: "/login".into() });
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = ApiClient::builder().base_url("ftp://nope").build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}
