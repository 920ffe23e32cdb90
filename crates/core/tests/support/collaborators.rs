use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use devconsole_core::{CredentialStore, SessionTerminator};
use devconsole_domain::{Credential, Result as DomainResult};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

/// In-memory credential store with synchronous inspection helpers.
#[derive(Default)]
pub struct MemoryStore {
    credential: Mutex<Option<Credential>>,
}

impl MemoryStore {
    pub fn seed(&self, access: &str, refresh: &str) {
        *self.credential.lock() = Some(Credential::new(access, refresh));
    }

    pub fn snapshot(&self) -> Option<Credential> {
        self.credential.lock().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.credential.lock().as_ref().map(|c| c.access_token.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn get(&self) -> DomainResult<Option<Credential>> {
        Ok(self.snapshot())
    }

    async fn set(&self, credential: Credential) -> DomainResult<()> {
        *self.credential.lock() = Some(credential);
        Ok(())
    }

    async fn clear(&self) -> DomainResult<()> {
        *self.credential.lock() = None;
        Ok(())
    }
}

/// Terminator that clears the store and counts invocations.
///
/// With a gate it holds inside `terminate` until a permit is released.
pub struct CountingTerminator {
    store: Arc<MemoryStore>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl CountingTerminator {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store, calls: AtomicUsize::new(0), gate: None }
    }

    pub fn gated(store: Arc<MemoryStore>, gate: Arc<Semaphore>) -> Self {
        Self { store, calls: AtomicUsize::new(0), gate: Some(gate) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionTerminator for CountingTerminator {
    async fn terminate(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.store.clear().await;
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }
}
