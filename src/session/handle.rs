//! The client's owned view of the configuration.

use crate::config::ClientSettings;
use crate::credentials;
use crate::document::{overlay, ConfigDocument, UserRecord, WriteSummary, ADMIN_USER};
use crate::error::{SyncError, SyncResult};
use crate::i18n::Lang;
use crate::remote::{ConfigPublisher, FetchOutcome, RemoteConfigClient};
use crate::store::LocalConfigStore;

/// Loaded configuration plus the collaborators needed to refresh and
/// persist it. Every mutation is saved before it returns.
#[derive(Debug)]
pub struct ConfigHandle {
    store: LocalConfigStore,
    remote: Option<RemoteConfigClient>,
    document: ConfigDocument,
}

impl ConfigHandle {
    /// Load the local document. Remote state is only applied by `reload`.
    pub fn open(store: LocalConfigStore, remote: Option<RemoteConfigClient>) -> Self {
        let document = store.load();
        Self {
            store,
            remote,
            document,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> SyncResult<Self> {
        let store = LocalConfigStore::new(&settings.config_path)
            .with_token_override(settings.token_override.clone());
        let remote = match &settings.remote_url {
            Some(url) => Some(RemoteConfigClient::with_timeout(
                url.clone(),
                &settings.cache_path,
                settings.fetch_timeout,
            )?),
            None => None,
        };
        Ok(Self::open(store, remote))
    }

    /// Re-read the local file and overlay the remote document on it.
    ///
    /// Returns `None` when no remote endpoint is configured.
    pub async fn reload(&mut self) -> Option<FetchOutcome> {
        let local = self.store.load();
        let Some(remote) = &self.remote else {
            self.document = local;
            return None;
        };

        let outcome = remote.fetch().await;
        let mut merged = match outcome.document() {
            Some(patch) => overlay(&local, patch),
            None => local,
        };
        self.store.apply_overrides(&mut merged);
        self.document = merged;
        Some(outcome)
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn lang(&self) -> Lang {
        Lang::from_tag(&self.document.lang)
    }

    /// Check credentials. Inputs are trimmed.
    ///
    /// A legacy digest that verifies is upgraded to the current hash.
    pub fn authenticate(&mut self, username: &str, password: &str) -> SyncResult<UserRecord> {
        let username = username.trim();
        let password = password.trim();

        let record = self
            .document
            .user(username)
            .filter(|record| credentials::verify(&record.password_hash, password))
            .cloned()
            .ok_or(SyncError::InvalidCredentials)?;

        if credentials::is_legacy_digest(&record.password_hash) {
            if let Some(stored) = self.document.users.get_mut(username) {
                stored.password_hash = credentials::hash_password(password);
            }
            match self.store.save(&mut self.document) {
                Ok(()) => tracing::info!(user = %username, "Upgraded legacy password digest"),
                Err(e) => tracing::warn!(user = %username, error = %e, "Failed to save upgraded password"),
            }
        }

        tracing::info!(user = %username, admin = record.is_admin, "User logged in");
        Ok(record)
    }

    /// Agent id needed to log time as `username`.
    pub fn agent_id_for(&self, username: &str) -> SyncResult<&str> {
        let record = self
            .document
            .user(username)
            .ok_or_else(|| SyncError::Validation(format!("unknown user '{}'", username)))?;
        if !record.has_agent_id() {
            return Err(SyncError::Validation(format!(
                "user '{}' has no agent id",
                username
            )));
        }
        Ok(record.agent_id.trim())
    }

    /// Create or replace a user.
    ///
    /// An empty password keeps the existing one; new users need one.
    pub fn upsert_user(
        &mut self,
        name: &str,
        password: &str,
        agent_id: &str,
        is_admin: bool,
    ) -> SyncResult<()> {
        let name = name.trim();
        let password = password.trim();
        if name.is_empty() {
            return Err(SyncError::Validation("user name is required".into()));
        }
        if name == ADMIN_USER && !is_admin {
            return Err(SyncError::Validation(
                "the admin account must keep admin rights".into(),
            ));
        }

        let password_hash = match (password.is_empty(), self.document.user(name)) {
            (false, _) => credentials::hash_password(password),
            (true, Some(existing)) => existing.password_hash.clone(),
            (true, None) => {
                return Err(SyncError::Validation(
                    "a password is required for new users".into(),
                ))
            }
        };

        self.document.users.insert(
            name.to_string(),
            UserRecord {
                password_hash,
                agent_id: agent_id.trim().to_string(),
                is_admin,
            },
        );
        self.save()?;
        tracing::info!(user = %name, admin = is_admin, "User saved");
        Ok(())
    }

    pub fn remove_user(&mut self, name: &str) -> SyncResult<()> {
        let name = name.trim();
        if name == ADMIN_USER {
            return Err(SyncError::Validation(
                "the admin account cannot be removed".into(),
            ));
        }
        if self.document.users.remove(name).is_none() {
            return Err(SyncError::Validation(format!("unknown user '{}'", name)));
        }
        self.save()?;
        tracing::info!(user = %name, "User removed");
        Ok(())
    }

    pub fn set_token(&mut self, token: &str) -> SyncResult<()> {
        self.document.token = token.trim().to_string();
        self.save()
    }

    pub fn set_lang(&mut self, lang: &str) -> SyncResult<()> {
        let lang = lang.trim();
        if lang.is_empty() {
            return Err(SyncError::Validation("language tag is required".into()));
        }
        self.document.lang = lang.to_string();
        self.save()
    }

    /// Persist the current view to the local file.
    pub fn save(&mut self) -> SyncResult<()> {
        self.store.save(&mut self.document)
    }

    pub async fn publish(&self, publisher: &ConfigPublisher) -> SyncResult<WriteSummary> {
        publisher.publish(&self.document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn handle(dir: &tempfile::TempDir) -> ConfigHandle {
        ConfigHandle::open(LocalConfigStore::new(dir.path().join("config.json")), None)
    }

    #[test]
    fn test_first_run_admin_has_no_password() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = handle(&dir);
        assert!(handle.authenticate("admin", "").unwrap().is_admin);
        assert!(matches!(
            handle.authenticate("admin", "x"),
            Err(SyncError::InvalidCredentials)
        ));
        assert!(matches!(
            handle.authenticate("ghost", ""),
            Err(SyncError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_upsert_and_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = handle(&dir);
        handle.upsert_user(" ana ", "pw", " 99 ", false).unwrap();

        let stored = &handle.document().user("ana").unwrap().password_hash;
        assert!(credentials::is_hashed(stored));
        assert!(handle.authenticate("ana", " pw ").is_ok());
        assert_eq!(handle.agent_id_for("ana").unwrap(), "99");

        // Reopening sees the persisted user.
        let mut reopened = ConfigHandle::open(
            LocalConfigStore::new(dir.path().join("config.json")),
            None,
        );
        assert!(reopened.authenticate("ana", "pw").is_ok());
    }

    #[test]
    fn test_empty_password_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = handle(&dir);
        handle.upsert_user("ana", "pw", "1", false).unwrap();
        handle.upsert_user("ana", "", "2", true).unwrap();
        assert!(handle.authenticate("ana", "pw").unwrap().is_admin);
        assert_eq!(handle.agent_id_for("ana").unwrap(), "2");

        let err = handle.upsert_user("bia", "", "3", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_admin_rules() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = handle(&dir);
        assert!(matches!(
            handle.upsert_user("admin", "pw", "", false),
            Err(SyncError::Validation(_))
        ));
        assert!(matches!(
            handle.remove_user("admin"),
            Err(SyncError::Validation(_))
        ));
        assert!(matches!(
            handle.remove_user("nobody"),
            Err(SyncError::Validation(_))
        ));
        handle.upsert_user("admin", "new", "", true).unwrap();
        assert!(handle.authenticate("admin", "new").is_ok());
    }

    #[test]
    fn test_missing_agent_blocks_time_logging_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = handle(&dir);
        handle.upsert_user("caio", "pw", "", false).unwrap();
        assert!(handle.authenticate("caio", "pw").is_ok());
        assert_eq!(
            handle.agent_id_for("caio").unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_legacy_digest_upgraded_on_login() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"usuarios": {"admin": {"senha": "sha256$8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918", "agent_id": "", "admin": true}}}"#,
        )
        .unwrap();

        let mut handle = ConfigHandle::open(LocalConfigStore::new(&path), None);
        handle.authenticate("admin", "admin").unwrap();

        let on_disk = LocalConfigStore::new(&path).probe().into_valid().unwrap();
        let stored = &on_disk.user("admin").unwrap().password_hash;
        assert!(credentials::is_hashed(stored));
        assert!(credentials::verify(stored, "admin"));
    }

    #[test]
    fn test_token_and_lang() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = handle(&dir);
        handle.set_token(" T1 ").unwrap();
        handle.set_lang("en").unwrap();
        assert_eq!(handle.document().token, "T1");
        assert_eq!(handle.lang(), Lang::En);
        assert!(handle.set_lang(" ").is_err());
    }

    #[tokio::test]
    async fn test_env_token_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        let cache = dir.path().join("cache.json");
        std::fs::write(&config, r#"{"token": "FILE"}"#).unwrap();
        std::fs::write(&cache, r#"{"version": 2, "token": "SERVER", "lang": "en"}"#).unwrap();

        let store = LocalConfigStore::new(&config).with_token_override(Some("ENV".into()));
        let remote = RemoteConfigClient::with_timeout(
            "http://127.0.0.1:9/client-config",
            &cache,
            std::time::Duration::from_millis(500),
        )
        .unwrap();
        let mut handle = ConfigHandle::open(store, Some(remote));

        let outcome = handle.reload().await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Cached(_)));
        assert_eq!(handle.document().token, "ENV");
        assert_eq!(handle.document().version, 2);
        assert_eq!(handle.lang(), Lang::En);

        handle.save().unwrap();
        let on_disk = LocalConfigStore::new(&config).probe().into_valid().unwrap();
        assert_eq!(on_disk.token, "FILE");
    }

    #[tokio::test]
    async fn test_reload_without_remote() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = handle(&dir);
        assert!(handle.reload().await.is_none());
        assert!(handle.document().user(ADMIN_USER).is_some());
    }
}
