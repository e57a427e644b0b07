//! Authoritative uploaded-files list.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;

use crate::backend::FileBackend;
use crate::error::Result;

/// One server-side file entry, identifiers and metadata assigned by the
/// backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: i64,
    pub original_name: String,
    pub file_type: String,
    pub upload_time: String,
    #[serde(default)]
    pub processed: bool,
}

/// Owns the uploaded-files list.
///
/// The list only ever changes by re-fetching from the backend; nothing is
/// inserted optimistically, so server-assigned identifiers and metadata
/// never drift. Collaborators request a refresh (directly or through the
/// upload coordinator's `files_changed` signal) instead of mutating the
/// list themselves.
pub struct FileCatalog<B> {
    backend: Arc<B>,
    files: Arc<RwLock<Vec<StoredFile>>>,
}

impl<B> Clone for FileCatalog<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            files: self.files.clone(),
        }
    }
}

impl<B: FileBackend + 'static> FileCatalog<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            files: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Re-fetches the list from the backend, replacing it wholesale.
    pub async fn refresh(&self) -> Result<()> {
        let files = self.backend.list_files().await?;
        *self.files.write().await = files;
        Ok(())
    }

    /// Snapshot of the current list.
    pub async fn snapshot(&self) -> Vec<StoredFile> {
        self.files.read().await.clone()
    }

    /// Looks up one entry by its server-assigned id.
    pub async fn find(&self, id: i64) -> Option<StoredFile> {
        self.files
            .read()
            .await
            .iter()
            .find(|file| file.id == id)
            .cloned()
    }

    /// Re-fetches the list whenever the upload coordinator signals a
    /// change. The task ends when the sender side is dropped.
    pub fn spawn_refresh_on_change(&self, mut changed: watch::Receiver<u64>) -> JoinHandle<()> {
        let catalog = self.clone();
        tokio::spawn(async move {
            while changed.changed().await.is_ok() {
                if let Err(e) = catalog.refresh().await {
                    tracing::warn!("[Files] Refresh after upload failed: {}", e);
                }
            }
        })
    }
}
