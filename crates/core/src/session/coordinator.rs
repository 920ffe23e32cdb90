//! Single-flight token refresh
//!
//! The coordinator owns the `Idle | Refreshing` flag and the queue of parked
//! requests. Both are mutated only here, under one short critical section
//! that never spans an `.await`.
//!
//! Cycle outline:
//! 1. The first 401 seen while `Idle` parks its request, flips to
//!    `Refreshing`, and spawns the cycle task.
//! 2. Every 401 seen while `Refreshing` parks behind it.
//! 3. On success the new credential is stored first, then the queue is taken
//!    and the flag returns to `Idle` atomically, and the parked requests are
//!    retried in arrival order with the new access token.
//! 4. On failure the session terminator runs once, then the queue is taken and
//!    every parked request is rejected with the same error.
//!
//! The cycle runs on its own task so that a caller abandoning its future
//! cannot strand the others.

use std::sync::Arc;

use devconsole_domain::constants::REFRESH_TOKEN_FIELD;
use devconsole_domain::{ApiError, Credential, HttpResponse, RequestSpec, TokenResponse};
use futures::future::join_all;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::oneshot;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::exchange::Exchange;
use super::pending::{PendingOutcome, PendingQueue, PendingRequest, RefreshState};
use super::ports::{CredentialStore, SessionTerminator};

enum Admission {
    RetryNow(RequestSpec),
    Parked { receiver: oneshot::Receiver<PendingOutcome>, start_cycle: bool },
}

#[derive(Debug, Default)]
struct CoordinatorState {
    phase: RefreshState,
    queue: PendingQueue,
    /// Bumped every time a cycle resolves
    epoch: u64,
    cycles: u64,
}

/// Owner of the refresh protocol for one client session
pub struct RefreshCoordinator {
    exchange: Arc<Exchange>,
    store: Arc<dyn CredentialStore>,
    terminator: Arc<dyn SessionTerminator>,
    refresh_path: String,
    state: Mutex<CoordinatorState>,
}

impl RefreshCoordinator {
    pub fn new(
        exchange: Arc<Exchange>,
        store: Arc<dyn CredentialStore>,
        terminator: Arc<dyn SessionTerminator>,
        refresh_path: impl Into<String>,
    ) -> Self {
        Self {
            exchange,
            store,
            terminator,
            refresh_path: refresh_path.into(),
            state: Mutex::new(CoordinatorState::default()),
        }
    }

    /// Current refresh flag
    #[must_use]
    pub fn state(&self) -> RefreshState {
        self.state.lock().phase
    }

    /// Number of requests parked behind the in-flight refresh
    #[must_use]
    pub fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Number of refresh exchanges started so far
    #[must_use]
    pub fn cycles_started(&self) -> u64 {
        self.state.lock().cycles
    }

    /// Credential epoch.
    ///
    /// Read it *after* reading the credential used for a request and pass it
    /// back to [`Self::handle_unauthorized`]; a request whose epoch is older
    /// than the current one was sent with a credential that has since been
    /// replaced.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.state.lock().epoch
    }

    /// Resolve a request that just received a 401.
    ///
    /// The request is parked until the refresh resolves, starting the refresh
    /// if none is in flight. If a cycle already completed after the request
    /// was sent (`sent_at_epoch` is stale) it is retried straight away with
    /// the current credential instead of starting another cycle.
    ///
    /// The returned result is the single retry's outcome, or
    /// `ApiError::RefreshFailed` carrying the refresh error.
    ///
    /// # Errors
    /// See above; `ApiError::SessionClosed` if the coordinator is dropped
    /// while the request is parked.
    pub async fn handle_unauthorized(
        self: &Arc<Self>,
        spec: RequestSpec,
        sent_at_epoch: u64,
    ) -> Result<HttpResponse, ApiError> {
        let admission = {
            let mut state = self.state.lock();

            if state.phase == RefreshState::Idle && sent_at_epoch < state.epoch {
                Admission::RetryNow(spec)
            } else {
                let (pending, receiver) = PendingRequest::park(spec);
                debug!(
                    path = %pending.spec().path,
                    queued = state.queue.len() + 1,
                    "parking request"
                );
                state.queue.push(pending);

                let start_cycle = state.phase == RefreshState::Idle;
                if start_cycle {
                    state.phase = RefreshState::Refreshing;
                    state.cycles += 1;
                }
                Admission::Parked { receiver, start_cycle }
            }
        };

        match admission {
            Admission::RetryNow(spec) => {
                debug!(path = %spec.path, "credential rotated since request was sent; retrying");
                self.retry_with_current(&spec).await
            }
            Admission::Parked { receiver, start_cycle } => {
                if start_cycle {
                    let coordinator = Arc::clone(self);
                    let span = info_span!("token_refresh", epoch = sent_at_epoch);
                    tokio::spawn(async move { coordinator.run_cycle().await }.instrument(span));
                }
                receiver.await.unwrap_or(Err(ApiError::SessionClosed))
            }
        }
    }

    async fn retry_with_current(&self, spec: &RequestSpec) -> Result<HttpResponse, ApiError> {
        let credential = self.store.get().await?;
        let token = credential.as_ref().map(|c| c.access_token.as_str());
        self.exchange.send_once(spec, token).await
    }

    async fn run_cycle(self: Arc<Self>) {
        info!("starting token refresh");

        let outcome = match self.refresh_exchange().await {
            Ok(credential) => match self.store.set(credential.clone()).await {
                Ok(()) => Ok(credential),
                Err(err) => Err(ApiError::from(err)),
            },
            Err(err) => Err(err),
        };

        match outcome {
            Ok(credential) => self.complete(&credential).await,
            Err(err) => self.abort(err).await,
        }
    }

    /// The one refresh exchange of a cycle. Any error is terminal.
    async fn refresh_exchange(&self) -> Result<Credential, ApiError> {
        let refresh_token = self.store.get().await?.map(|c| c.refresh_token);
        if refresh_token.is_none() {
            warn!("no stored credential; refresh exchange sent without a refresh token");
        }

        let spec = RequestSpec::post(self.refresh_path.clone())
            .json(json!({ REFRESH_TOKEN_FIELD: refresh_token.clone().unwrap_or_default() }))
            .refresh_exchange();

        let response = self.exchange.send_once(&spec, refresh_token.as_deref()).await?;
        let tokens: TokenResponse = response.json()?;
        Ok(Credential::from(tokens))
    }

    async fn complete(&self, credential: &Credential) {
        let drained: Vec<PendingRequest> = {
            let mut state = self.state.lock();
            state.epoch += 1;
            state.phase = RefreshState::Idle;
            state.queue.drain().collect()
        };

        info!(queued = drained.len(), "token refresh succeeded; resuming parked requests");

        // join_all polls in order, so retries start in arrival order and then
        // run concurrently.
        let token = credential.access_token.as_str();
        join_all(drained.into_iter().map(|pending| pending.resume(&self.exchange, token))).await;
    }

    async fn abort(&self, err: ApiError) {
        error!(error = %err, "token refresh failed; terminating session");

        // Still `Refreshing` here: 401s arriving during teardown park and are
        // rejected below instead of starting another cycle.
        self.terminator.terminate().await;

        let drained: Vec<PendingRequest> = {
            let mut state = self.state.lock();
            state.epoch += 1;
            state.phase = RefreshState::Idle;
            state.queue.drain().collect()
        };

        warn!(rejected = drained.len(), "rejecting parked requests");
        let failure = ApiError::RefreshFailed(Box::new(err));
        for pending in drained {
            pending.fail(failure.clone());
        }
    }
}
