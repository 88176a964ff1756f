//! Host-owned persisted state.
//!
//! Two tiny key/value records back the whole shell: the credential pair and
//! the cache-clear marker. Each store is a trait with an in-memory
//! implementation for tests and a JSON-file implementation for production.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use cantine_protocols::Credentials;

use crate::error::StoreError;

/// Storage for the single credential set.
///
/// Invariant: at most one credential set exists at a time; `save` replaces
/// any previous record.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError>;

    async fn load(&self) -> Result<Option<Credentials>, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

/// Storage for the last cache-clear timestamp.
#[async_trait]
pub trait ClearMarkerStore: Send + Sync {
    async fn last_clear(&self) -> Result<Option<DateTime<Local>>, StoreError>;

    async fn record_clear(&self, at: DateTime<Local>) -> Result<(), StoreError>;
}

/// In-memory credential store for testing.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: tokio::sync::RwLock<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        *self.slot.write().await = Some(credentials.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Credentials>, StoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.write().await = None;
        Ok(())
    }
}

/// File-backed credential store: one JSON file under the state directory.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store writing to `{state_dir}/credentials.json`.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: state_dir.into().join("credentials.json"),
        }
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.ensure_parent().await?;
        let json = serde_json::to_vec_pretty(credentials)?;
        fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Credentials>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ClearMarker {
    cleared_at: DateTime<Local>,
}

/// In-memory clear-marker store for testing.
#[derive(Default)]
pub struct MemoryClearMarkerStore {
    slot: tokio::sync::RwLock<Option<DateTime<Local>>>,
}

impl MemoryClearMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClearMarkerStore for MemoryClearMarkerStore {
    async fn last_clear(&self) -> Result<Option<DateTime<Local>>, StoreError> {
        Ok(*self.slot.read().await)
    }

    async fn record_clear(&self, at: DateTime<Local>) -> Result<(), StoreError> {
        *self.slot.write().await = Some(at);
        Ok(())
    }
}

/// File-backed clear-marker store.
pub struct FileClearMarkerStore {
    path: PathBuf,
}

impl FileClearMarkerStore {
    /// Create a store writing to `{state_dir}/last_cache_clear.json`.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: state_dir.into().join("last_cache_clear.json"),
        }
    }
}

#[async_trait]
impl ClearMarkerStore for FileClearMarkerStore {
    async fn last_clear(&self) -> Result<Option<DateTime<Local>>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                let marker: ClearMarker = serde_json::from_slice(&bytes)?;
                Ok(Some(marker.cleared_at))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn record_clear(&self, at: DateTime<Local>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec(&ClearMarker { cleared_at: at })?;
        fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), "cache clear recorded");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
