//! Shared test helpers for `devconsole-core` integration tests.
//!
//! These helpers provide a scripted backend and lightweight collaborators so
//! that the refresh tests can focus on sequencing instead of boilerplate.

#![allow(dead_code)]

pub mod backend;
pub mod collaborators;

use std::sync::Arc;
use std::time::Duration;

use devconsole_core::RequestDispatcher;
use tokio::sync::Semaphore;

pub use backend::{FakeBackend, RecordedCall, RefreshBehavior};
pub use collaborators::{CountingTerminator, MemoryStore};

pub const BASE_URL: &str = "http://console.test/api/v1";
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Dispatcher wired to a fake backend, an in-memory store and a counting
/// terminator.
pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub store: Arc<MemoryStore>,
    pub terminator: Arc<CountingTerminator>,
    pub dispatcher: RequestDispatcher,
}

impl Harness {
    pub fn new(backend: FakeBackend) -> Self {
        Self::build(backend, None)
    }

    /// Like [`Harness::new`], but session teardown blocks on `gate`.
    pub fn with_terminator_gate(backend: FakeBackend, gate: Arc<Semaphore>) -> Self {
        Self::build(backend, Some(gate))
    }

    fn build(backend: FakeBackend, terminator_gate: Option<Arc<Semaphore>>) -> Self {
        let store = Arc::new(MemoryStore::default());
        let backend = Arc::new(backend.observing(Arc::clone(&store)));
        let terminator = Arc::new(match terminator_gate {
            Some(gate) => CountingTerminator::gated(Arc::clone(&store), gate),
            None => CountingTerminator::new(Arc::clone(&store)),
        });
        let dispatcher = RequestDispatcher::new(
            backend.clone(),
            store.clone(),
            terminator.clone(),
            BASE_URL,
            REFRESH_PATH,
        );
        Self { backend, store, terminator, dispatcher }
    }

    /// Poll `condition` until it holds, failing the test after two seconds.
    pub async fn wait_until(&self, what: &str, condition: impl Fn() -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while !condition() {
            assert!(tokio::time::Instant::now() < deadline, "timed out waiting for {what}");
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}
