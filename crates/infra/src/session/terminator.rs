use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use devconsole_core::{CredentialStore, Navigator, SessionTerminator};
use tracing::{error, warn};

/// Ends the session: forgets the credential and sends the user to login
pub struct LoginRedirectTerminator {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    terminations: AtomicU64,
}

impl LoginRedirectTerminator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self { store, navigator, login_route: login_route.into(), terminations: AtomicU64::new(0) }
    }

    /// Number of sessions ended by a failed refresh
    #[must_use]
    pub fn terminations(&self) -> u64 {
        self.terminations.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn login_route(&self) -> &str {
        &self.login_route
    }
}

#[async_trait]
impl SessionTerminator for LoginRedirectTerminator {
    async fn terminate(&self) {
        let count = self.terminations.fetch_add(1, Ordering::SeqCst) + 1;
        warn!(route = %self.login_route, terminations = count, "session terminated");

        if let Err(err) = self.store.clear().await {
            error!(error = %err, "failed to clear credential during termination");
        }
        self.navigator.navigate(&self.login_route);
    }
}
