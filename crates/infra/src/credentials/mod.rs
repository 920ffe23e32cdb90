//! Credential store adapters
//!
//! - [`InMemoryCredentialStore`]: process-local, for tests and ephemeral
//!   sessions
//! - [`FileCredentialStore`]: JSON document on disk, replaced atomically
//! - [`KeychainCredentialStore`]: platform keychain via `keyring`

pub mod file;
pub mod keychain;
pub mod memory;

use std::sync::Arc;

use devconsole_core::CredentialStore;
use devconsole_domain::{CredentialBackend, CredentialStoreConfig};
use tracing::debug;

pub use file::FileCredentialStore;
pub use keychain::KeychainCredentialStore;
pub use memory::InMemoryCredentialStore;

/// Build the store selected by `config.backend`
#[must_use]
pub fn build_credential_store(config: &CredentialStoreConfig) -> Arc<dyn CredentialStore> {
    debug!(backend = %config.backend, "building credential store");
    match config.backend {
        CredentialBackend::Memory => Arc::new(InMemoryCredentialStore::new()),
        CredentialBackend::File => Arc::new(FileCredentialStore::new(&config.path)),
        CredentialBackend::Keychain => {
            Arc::new(KeychainCredentialStore::new(&config.service_name, &config.account))
        }
    }
}
