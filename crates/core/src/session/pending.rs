//! Suspended requests waiting on a refresh cycle

use std::collections::VecDeque;

use devconsole_domain::{ApiError, HttpResponse, RequestSpec};
use tokio::sync::oneshot;
use tracing::debug;

use super::exchange::Exchange;

/// Outcome delivered to a suspended caller
pub type PendingOutcome = Result<HttpResponse, ApiError>;

/// Refresh single-flight flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
}

/// One caller's request, parked until the in-flight refresh resolves
///
/// Consumed exactly once, by either [`PendingRequest::resume`] or
/// [`PendingRequest::fail`]. Dropping it unresolved makes the caller observe
/// `ApiError::SessionClosed`.
#[derive(Debug)]
pub struct PendingRequest {
    spec: RequestSpec,
    responder: oneshot::Sender<PendingOutcome>,
}

impl PendingRequest {
    /// Park `spec`; the returned receiver yields the eventual outcome
    #[must_use]
    pub fn park(spec: RequestSpec) -> (Self, oneshot::Receiver<PendingOutcome>) {
        let (responder, receiver) = oneshot::channel();
        (Self { spec, responder }, receiver)
    }

    #[must_use]
    pub const fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    /// Retry the original request once with `access_token` and deliver the
    /// result, whatever it is. A 401 here is final.
    pub async fn resume(self, exchange: &Exchange, access_token: &str) {
        let outcome = exchange.send_once(&self.spec, Some(access_token)).await;
        if let Err(err) = &outcome {
            debug!(path = %self.spec.path, error = err.label(), "retried request failed");
        }
        if self.responder.send(outcome).is_err() {
            debug!(path = %self.spec.path, "caller went away before its retry completed");
        }
    }

    /// Reject the caller with `error`
    pub fn fail(self, error: ApiError) {
        let _ = self.responder.send(Err(error));
    }
}

/// FIFO of parked requests, in arrival order of their 401s
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: VecDeque<PendingRequest>,
}

impl PendingQueue {
    pub fn push(&mut self, request: PendingRequest) {
        self.entries.push_back(request);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every entry, oldest first, leaving the queue empty
    pub fn drain(&mut self) -> impl Iterator<Item = PendingRequest> {
        std::mem::take(&mut self.entries).into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fail_delivers_error() {
        let (pending, receiver) = PendingRequest::park(RequestSpec::get("/alerts"));
        pending.fail(ApiError::SessionClosed);
        assert_eq!(receiver.await.unwrap(), Err(ApiError::SessionClosed));
    }

    #[tokio::test]
    async fn test_dropped_request_closes_receiver() {
        let (pending, receiver) = PendingRequest::park(RequestSpec::get("/alerts"));
        drop(pending);
        assert!(receiver.await.is_err());
    }

    #[test]
    fn test_queue_drains_in_arrival_order() {
        let mut queue = PendingQueue::default();
        let mut receivers = Vec::new();
        for path in ["/a", "/b", "/c"] {
            let (pending, receiver) = PendingRequest::park(RequestSpec::get(path));
            queue.push(pending);
            receivers.push(receiver);
        }

        assert_eq!(queue.len(), 3);
        let order: Vec<String> = queue.drain().map(|p| p.spec().path.clone()).collect();
        assert_eq!(order, vec!["/a", "/b", "/c"]);
        assert!(queue.is_empty());
    }
}
