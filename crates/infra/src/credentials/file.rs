//! Credential persisted as a small JSON document
//!
//! ```json
//! { "credential": { "access_token": "...", "refresh_token": "..." },
//!   "stored_at": "2024-05-01T12:00:00Z" }
//! ```
//!
//! Writes go to a sibling temp file that is then renamed over the target, so
//! readers only ever see the previous or the new pair.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devconsole_core::CredentialStore;
use devconsole_domain::{Credential, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::InfraError;

#[derive(Serialize, Deserialize)]
struct StoredCredential {
    credential: Credential,
    stored_at: DateTime<Utc>,
}

/// JSON file backed credential store
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    // Serialises writers within this process.
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time the current credential was written, if any
    ///
    /// # Errors
    /// Same as [`CredentialStore::get`].
    pub async fn stored_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read().await?.map(|stored| stored.stored_at))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read(&self) -> Result<Option<StoredCredential>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        let stored = serde_json::from_slice(&bytes).map_err(InfraError::from)?;
        Ok(Some(stored))
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<Credential>> {
        Ok(self.read().await?.map(|stored| stored.credential))
    }

    async fn set(&self, credential: Credential) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let document = StoredCredential { credential, stored_at: Utc::now() };
        let bytes = serde_json::to_vec_pretty(&document).map_err(InfraError::from)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await.map_err(InfraError::from)?;
        tokio::fs::rename(&temp, &self.path).await.map_err(InfraError::from)?;

        debug!(path = %self.path.display(), "credential written");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "credential file removed");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to remove credential file");
                Err(InfraError::from(err).into())
            }
        }
    }
}
