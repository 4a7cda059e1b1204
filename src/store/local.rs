//! The client's local configuration file.

use std::path::{Path, PathBuf};

use crate::credentials;
use crate::document::ConfigDocument;
use crate::error::SyncResult;
use crate::store::{atomic, probe_json, DocumentState};

/// Reads and writes the local `config.json`.
#[derive(Debug, Clone)]
pub struct LocalConfigStore {
    path: PathBuf,
    /// Applied to the loaded view only, never written back by `load`.
    token_override: Option<String>,
}

impl LocalConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            token_override: None,
        }
    }

    /// Prefer this token over the stored one when loading. Blank values
    /// are ignored.
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        self.token_override = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inspect the file without repairing it.
    pub fn probe(&self) -> DocumentState<ConfigDocument> {
        probe_json(&self.path)
    }

    /// Load the document, repairing and persisting it when needed.
    ///
    /// Never fails: a missing or corrupt file is replaced by defaults, and a
    /// failed repair write is logged.
    pub fn load(&self) -> ConfigDocument {
        let (mut doc, mut dirty) = match self.probe() {
            DocumentState::Valid(doc) => (doc, false),
            DocumentState::Absent => {
                tracing::info!(path = %self.path.display(), "No local config, creating defaults");
                (ConfigDocument::default(), true)
            }
            DocumentState::Corrupt(reason) => {
                tracing::warn!(
                    path = %self.path.display(),
                    reason = %reason,
                    "Local config is corrupt, replacing with defaults"
                );
                (ConfigDocument::default(), true)
            }
        };

        dirty |= doc.normalize();
        dirty |= migrate_passwords(&mut doc);

        if dirty {
            if let Err(e) = atomic::write_json(&self.path, &doc) {
                tracing::warn!(error = %e, "Failed to persist repaired local config");
            }
        }

        self.apply_overrides(&mut doc);
        doc
    }

    /// Put the environment token back over whatever `doc` carries.
    pub fn apply_overrides(&self, doc: &mut ConfigDocument) {
        if let Some(token) = &self.token_override {
            doc.token = token.clone();
        }
    }

    /// Normalize, hash any plaintext passwords, and write the document.
    ///
    /// While the token is the environment override, the file keeps the
    /// token it already had.
    pub fn save(&self, doc: &mut ConfigDocument) -> SyncResult<()> {
        doc.normalize();
        migrate_passwords(doc);
        match self.token_override.as_deref() {
            Some(token) if doc.token == token => {
                let mut on_disk = doc.clone();
                on_disk.token = match self.probe() {
                    DocumentState::Valid(stored) => stored.token,
                    _ => String::new(),
                };
                atomic::write_json(&self.path, &on_disk)?;
            }
            _ => atomic::write_json(&self.path, doc)?,
        }
        tracing::debug!(path = %self.path.display(), users = doc.users.len(), "Local config saved");
        Ok(())
    }
}

/// Hash every legacy plaintext password. Returns `true` if any changed.
pub fn migrate_passwords(doc: &mut ConfigDocument) -> bool {
    let mut migrated = 0usize;
    for record in doc.users.values_mut() {
        if credentials::needs_migration(&record.password_hash) {
            record.password_hash = credentials::hash_password(&record.password_hash);
            migrated += 1;
        }
    }
    if migrated > 0 {
        tracing::info!(count = migrated, "Migrated plaintext passwords");
    }
    migrated > 0
}
