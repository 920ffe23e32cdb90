use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use devconsole_core::Transport;
use devconsole_domain::{ApiError, HttpResponse, TransportRequest};
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Semaphore;

use super::{MemoryStore, BASE_URL, REFRESH_PATH};

/// One request observed by [`FakeBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    /// Access token held by the store when the call arrived
    pub stored_token: Option<String>,
}

/// How the backend answers the refresh exchange
#[derive(Debug, Clone)]
pub enum RefreshBehavior {
    /// Issue a new pair; the access token becomes the only valid one
    Issue { access: String, refresh: String },
    Reject(u16),
    Network,
}

#[derive(Debug, Clone)]
enum RouteOverride {
    Status(u16),
    Network,
    Hold(Arc<Semaphore>),
}

/// Scripted API server.
///
/// Ordinary routes answer `200 {"path": ...}` when the bearer token matches
/// the currently valid access token and 401 otherwise.
pub struct FakeBackend {
    valid_token: Mutex<String>,
    refresh: Mutex<RefreshBehavior>,
    refresh_gate: Option<Arc<Semaphore>>,
    overrides: Mutex<HashMap<String, RouteOverride>>,
    calls: Mutex<Vec<RecordedCall>>,
    store: Option<Arc<MemoryStore>>,
}

impl FakeBackend {
    pub fn new(valid_token: &str) -> Self {
        Self {
            valid_token: Mutex::new(valid_token.to_string()),
            refresh: Mutex::new(RefreshBehavior::Reject(401)),
            refresh_gate: None,
            overrides: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            store: None,
        }
    }

    pub fn issuing(self, access: &str, refresh: &str) -> Self {
        self.with_refresh(RefreshBehavior::Issue {
            access: access.to_string(),
            refresh: refresh.to_string(),
        })
    }

    pub fn with_refresh(self, behavior: RefreshBehavior) -> Self {
        *self.refresh.lock() = behavior;
        self
    }

    /// Hold refresh exchanges until a permit is added to `gate`
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.refresh_gate = Some(gate);
        self
    }

    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.overrides.lock().insert(path.to_string(), RouteOverride::Status(status));
        self
    }

    pub fn with_network_error(self, path: &str) -> Self {
        self.overrides.lock().insert(path.to_string(), RouteOverride::Network);
        self
    }

    /// Hold `path` until a permit is added to `gate`, then answer normally
    pub fn holding(self, path: &str, gate: Arc<Semaphore>) -> Self {
        self.overrides.lock().insert(path.to_string(), RouteOverride::Hold(gate));
        self
    }

    pub(crate) fn observing(mut self, store: Arc<MemoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls.lock().iter().filter(|c| c.path == path).cloned().collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.calls_to(REFRESH_PATH).len()
    }

    async fn answer_refresh(&self) -> Result<HttpResponse, ApiError> {
        if let Some(gate) = &self.refresh_gate {
            gate.acquire().await.map_err(|e| ApiError::Network(e.to_string()))?.forget();
        }

        let behavior = self.refresh.lock().clone();
        match behavior {
            RefreshBehavior::Issue { access, refresh } => {
                *self.valid_token.lock() = access.clone();
                Ok(HttpResponse::json_body(
                    200,
                    &json!({"access_token": access, "refresh_token": refresh, "token_type": "bearer"}),
                ))
            }
            RefreshBehavior::Reject(status) => {
                Ok(HttpResponse::json_body(status, &json!({"detail": "refresh rejected"})))
            }
            RefreshBehavior::Network => Err(ApiError::Network("connection reset".to_string())),
        }
    }

    fn answer_route(&self, path: &str, authorization: Option<&str>) -> HttpResponse {
        let expected = format!("Bearer {}", self.valid_token.lock());
        if authorization == Some(expected.as_str()) {
            HttpResponse::json_body(200, &json!({"path": path}))
        } else {
            HttpResponse::json_body(401, &json!({"detail": "Could not validate credentials"}))
        }
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn execute(&self, request: TransportRequest) -> Result<HttpResponse, ApiError> {
        let path = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .split('?')
            .next()
            .unwrap_or_default()
            .to_string();
        let authorization = request.header("Authorization").map(str::to_string);

        self.calls.lock().push(RecordedCall {
            method: request.method.to_string(),
            path: path.clone(),
            authorization: authorization.clone(),
            stored_token: self.store.as_ref().and_then(|s| s.access_token()),
        });

        if path == REFRESH_PATH {
            return self.answer_refresh().await;
        }

        let route = self.overrides.lock().get(&path).cloned();
        match route {
            Some(RouteOverride::Status(status)) => {
                Ok(HttpResponse::json_body(status, &json!({"detail": "route override"})))
            }
            Some(RouteOverride::Network) => Err(ApiError::Network("connection refused".to_string())),
            Some(RouteOverride::Hold(gate)) => {
                gate.acquire().await.map_err(|e| ApiError::Network(e.to_string()))?.forget();
                Ok(self.answer_route(&path, authorization.as_deref()))
            }
            None => Ok(self.answer_route(&path, authorization.as_deref())),
        }
    }
}
