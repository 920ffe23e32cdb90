//! Public entry point for authenticated requests

use std::sync::Arc;

use devconsole_domain::{ApiError, HttpResponse, RequestSpec};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::coordinator::RefreshCoordinator;
use super::exchange::Exchange;
use super::ports::{CredentialStore, SessionTerminator, Transport};

/// Attaches the current credential, relays to the transport, and hands 401s
/// to the refresh coordinator.
///
/// Callers see either the resolved response or a terminal error; whether a
/// refresh happened in between is invisible to them.
#[derive(Clone)]
pub struct RequestDispatcher {
    exchange: Arc<Exchange>,
    store: Arc<dyn CredentialStore>,
    coordinator: Arc<RefreshCoordinator>,
}

impl RequestDispatcher {
    /// Wire a dispatcher and its coordinator over the given collaborators
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        terminator: Arc<dyn SessionTerminator>,
        base_url: impl Into<String>,
        refresh_path: impl Into<String>,
    ) -> Self {
        let exchange = Arc::new(Exchange::new(transport, base_url));
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::clone(&exchange),
            Arc::clone(&store),
            terminator,
            refresh_path,
        ));
        Self { exchange, store, coordinator }
    }

    #[must_use]
    pub const fn coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.exchange.base_url()
    }

    /// Send `spec` and resolve with the final response.
    ///
    /// - 2xx resolves unchanged.
    /// - 401 on an ordinary request is resolved by the refresh coordinator
    ///   (one retry after one refresh at most).
    /// - 401 on the refresh exchange or an anonymous request is returned
    ///   directly, never re-entering the coordinator.
    /// - Other statuses and transport failures are returned untouched.
    ///
    /// # Errors
    /// See above.
    #[instrument(
        skip(self, spec),
        fields(request_id = %Uuid::new_v4(), method = %spec.method, path = %spec.path)
    )]
    pub async fn dispatch(&self, spec: RequestSpec) -> Result<HttpResponse, ApiError> {
        let token = if spec.is_anonymous() {
            None
        } else {
            self.store.get().await?.map(|credential| credential.access_token)
        };
        // Read after the credential; see `RefreshCoordinator::epoch`.
        let epoch = self.coordinator.epoch();

        match self.exchange.send_once(&spec, token.as_deref()).await {
            Err(ApiError::Unauthorized { .. }) if spec.refreshable() => {
                debug!(epoch, "received 401; deferring to refresh coordinator");
                self.coordinator.handle_unauthorized(spec, epoch).await
            }
            outcome => outcome,
        }
    }
}
