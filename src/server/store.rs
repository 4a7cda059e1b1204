//! The server's authoritative document file.

use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::document::{secure_merge, ConfigDocument, DocumentPatch};
use crate::error::{SyncError, SyncResult};
use crate::observability::metrics;
use crate::store::atomic;

/// Single JSON document guarded by a writer lock.
///
/// Writers hold the lock across load, merge and save. Readers only take it
/// to create the initial document; otherwise they read the file directly,
/// which is safe because writes replace it atomically.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current document bytes exactly as persisted, creating the initial
    /// document on first access.
    pub async fn read_raw(&self) -> SyncResult<Vec<u8>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                serde_json::from_slice::<ConfigDocument>(&bytes)
                    .map_err(|e| SyncError::Corrupt(e.to_string()))?;
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let _guard = self.write_lock.lock().await;
                if let Some(doc) = self.load().await? {
                    return atomic::to_pretty_json(&doc)
                        .map_err(|e| SyncError::Corrupt(e.to_string()));
                }
                let doc = ConfigDocument::initial_server();
                self.persist(&doc).await?;
                tracing::info!(path = %self.path.display(), "Created initial client config");
                atomic::to_pretty_json(&doc).map_err(|e| SyncError::Corrupt(e.to_string()))
            }
            Err(e) => Err(SyncError::io(&self.path, e)),
        }
    }

    /// Merge a write into the stored document and persist the new version.
    ///
    /// Nothing is written unless the merge completed.
    pub async fn apply(&self, patch: &DocumentPatch) -> SyncResult<ConfigDocument> {
        let _guard = self.write_lock.lock().await;

        let current = self
            .load()
            .await?
            .unwrap_or_else(ConfigDocument::initial_server);
        let merged = secure_merge(&current, patch);
        self.persist(&merged).await?;

        metrics::record_write(merged.version);
        tracing::info!(
            version = merged.version,
            users = merged.users.len(),
            has_token = merged.has_token(),
            "Client config updated"
        );
        Ok(merged)
    }

    async fn load(&self) -> SyncResult<Option<ConfigDocument>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| SyncError::Corrupt(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::io(&self.path, e)),
        }
    }

    async fn persist(&self, doc: &ConfigDocument) -> SyncResult<()> {
        let path = self.path.clone();
        let doc = doc.clone();
        tokio::task::spawn_blocking(move || atomic::write_json(&path, &doc))
            .await
            .map_err(|e| SyncError::io(&self.path, std::io::Error::other(e)))?
    }
}
