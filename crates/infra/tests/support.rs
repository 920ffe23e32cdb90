#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use devconsole_domain::Credential;
use devconsole_infra::{
    ApiClient, BroadcastNavigator, InMemoryCredentialStore, LoginRedirectTerminator,
    NavigationEvent,
};
use serde_json::json;
use tokio::sync::broadcast;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client wired against a mock server, with handles on its collaborators.
pub struct TestSession {
    pub client: ApiClient,
    pub store: Arc<InMemoryCredentialStore>,
    pub terminator: Arc<LoginRedirectTerminator>,
    pub navigation: broadcast::Receiver<NavigationEvent>,
}

impl TestSession {
    /// Session signed in as `T1`/`R1`.
    pub fn signed_in(server: &MockServer) -> Self {
        Self::with_store(server, InMemoryCredentialStore::with_credential(Credential::new("T1", "R1")))
    }

    pub fn with_store(server: &MockServer, store: InMemoryCredentialStore) -> Self {
        let store = Arc::new(store);
        let navigator = Arc::new(BroadcastNavigator::new());
        let navigation = navigator.subscribe();
        let terminator =
            Arc::new(LoginRedirectTerminator::new(store.clone(), navigator.clone(), "/login"));

        let client = ApiClient::builder()
            .base_url(server.uri())
            .store(store.clone())
            .navigator(navigator)
            .terminator(terminator.clone())
            .build()
            .expect("client should build");

        Self { client, store, terminator, navigation }
    }
}

/// `path` answers 200 for `Bearer {valid}` and 401 for `Bearer {expired}`.
pub async fn mount_guarded(server: &MockServer, route: &str, valid: &str, expired: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", format!("Bearer {valid}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "route": route })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", format!("Bearer {expired}").as_str()))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .mount(server)
        .await;
}

/// Refresh endpoint issuing `T2`/`R2` after `delay`, expected `times` times.
pub async fn mount_refresh_success(server: &MockServer, delay: Duration, times: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(delay)
                .set_body_json(json!({
                    "access_token": "T2",
                    "refresh_token": "R2",
                    "token_type": "bearer"
                })),
        )
        .expect(times)
        .mount(server)
        .await;
}

pub async fn mount_refresh_status(server: &MockServer, status: u16, delay: Duration) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(status).set_delay(delay))
        .expect(1)
        .mount(server)
        .await;
}

/// Authorization headers received for `route`, in arrival order.
pub async fn authorizations_for(server: &MockServer, route: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == route)
        .filter_map(|request| {
            request.headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string)
        })
        .collect()
}
