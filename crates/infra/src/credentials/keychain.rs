//! Credential stored in the platform keychain
//!
//! The pair is serialised as one JSON secret under `(service, account)` so
//! both tokens rotate together. `keyring` calls block, so they run on the
//! blocking pool.

use async_trait::async_trait;
use devconsole_core::CredentialStore;
use devconsole_domain::{ConsoleError, Credential, Result};
use keyring::Entry;
use tracing::debug;

use crate::errors::InfraError;

/// Platform keychain backed credential store
#[derive(Debug, Clone)]
pub struct KeychainCredentialStore {
    service_name: String,
    account: String,
}

impl KeychainCredentialStore {
    pub fn new(service_name: impl Into<String>, account: impl Into<String>) -> Self {
        Self { service_name: service_name.into(), account: account.into() }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service_name, &self.account).map_err(|e| InfraError::from(e).into())
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Self) -> Result<T> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || op(this))
            .await
            .map_err(|e| ConsoleError::Internal(format!("keychain task failed: {e}")))?
    }
}

#[async_trait]
impl CredentialStore for KeychainCredentialStore {
    async fn get(&self) -> Result<Option<Credential>> {
        self.blocking(|store| {
            debug!(service = %store.service_name, account = %store.account, "reading credential from keychain");
            match store.entry()?.get_password() {
                Ok(secret) => {
                    let credential = serde_json::from_str(&secret).map_err(InfraError::from)?;
                    Ok(Some(credential))
                }
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
    }

    async fn set(&self, credential: Credential) -> Result<()> {
        let secret = serde_json::to_string(&credential).map_err(InfraError::from)?;
        self.blocking(move |store| {
            store.entry()?.set_password(&secret).map_err(InfraError::from)?;
            debug!(service = %store.service_name, account = %store.account, "credential stored in keychain");
            Ok(())
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.blocking(|store| match store.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        })
        .await
    }
}
