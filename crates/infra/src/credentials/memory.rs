use async_trait::async_trait;
use devconsole_core::CredentialStore;
use devconsole_domain::{Credential, Result};
use parking_lot::RwLock;

/// Credential held in process memory only
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `credential`
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self { credential: RwLock::new(Some(credential)) }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self) -> Result<Option<Credential>> {
        Ok(self.credential.read().clone())
    }

    async fn set(&self, credential: Credential) -> Result<()> {
        *self.credential.write() = Some(credential);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.credential.write() = None;
        Ok(())
    }
}
