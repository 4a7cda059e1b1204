//! The shared configuration document.
//!
//! Field names on the wire are the ones deployed clients already read
//! (`usuarios`, `senha`, `admin`), so every renamed field carries a serde
//! attribute.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the account that must always exist and always be an admin.
pub const ADMIN_USER: &str = "admin";

/// Locale used when a document carries none.
pub const DEFAULT_LANG: &str = "pt-BR";

/// One desk agent account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct UserRecord {
    /// Empty, legacy plaintext, or a tagged hash (see `credentials`).
    #[serde(rename = "senha", default)]
    pub password_hash: String,

    /// Helpdesk agent id used to attribute time entries.
    #[serde(default)]
    pub agent_id: String,

    #[serde(rename = "admin", default)]
    pub is_admin: bool,
}

impl UserRecord {
    /// The synthesized admin account: no password, admin rights.
    pub fn bootstrap_admin() -> Self {
        Self {
            password_hash: String::new(),
            agent_id: String::new(),
            is_admin: true,
        }
    }

    pub fn has_agent_id(&self) -> bool {
        !self.agent_id.trim().is_empty()
    }
}

/// Root configuration document, local or server side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigDocument {
    /// Server-owned revision. Informational only on clients.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub version: u64,

    /// Accounts keyed by case-sensitive username.
    #[serde(rename = "usuarios", default)]
    pub users: BTreeMap<String, UserRecord>,

    /// Helpdesk API token. Empty means unset.
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl Default for ConfigDocument {
    fn default() -> Self {
        let mut users = BTreeMap::new();
        users.insert(ADMIN_USER.to_string(), UserRecord::bootstrap_admin());
        Self {
            version: 0,
            users,
            token: String::new(),
            lang: default_lang(),
        }
    }
}

impl ConfigDocument {
    /// Default document as first published by the server.
    pub fn initial_server() -> Self {
        Self {
            version: 1,
            ..Self::default()
        }
    }

    /// Restore the admin invariant and fill blank defaults.
    ///
    /// Returns `true` if anything changed. Applying it twice is the same as
    /// applying it once.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;

        match self.users.get_mut(ADMIN_USER) {
            Some(admin) if !admin.is_admin => {
                tracing::warn!("Admin account had admin rights removed, restoring");
                admin.is_admin = true;
                changed = true;
            }
            Some(_) => {}
            None => {
                self.users
                    .insert(ADMIN_USER.to_string(), UserRecord::bootstrap_admin());
                changed = true;
            }
        }

        if self.lang.trim().is_empty() {
            self.lang = default_lang();
            changed = true;
        }

        changed
    }

    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    pub fn user(&self, name: &str) -> Option<&UserRecord> {
        self.users.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document() {
        let doc = ConfigDocument::default();
        assert_eq!(doc.version, 0);
        assert_eq!(doc.lang, DEFAULT_LANG);
        assert!(!doc.has_token());
        let admin = doc.user(ADMIN_USER).unwrap();
        assert!(admin.is_admin);
        assert!(admin.password_hash.is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            r#"{}"#,
            r#"{"token": "abc"}"#,
            r#"{"usuarios": {}}"#,
            r#"{"usuarios": {"admin": {"senha": "x", "admin": false}}, "lang": ""}"#,
            r#"{"usuarios": {"bob": {"senha": "b"}}}"#,
        ] {
            let mut once: ConfigDocument = serde_json::from_str(raw).unwrap();
            once.normalize();
            let mut twice = once.clone();
            assert!(!twice.normalize(), "second pass changed {raw}");
            assert_eq!(once, twice);
            assert!(once.user(ADMIN_USER).unwrap().is_admin);
        }
    }

    #[test]
    fn test_normalize_keeps_admin_password() {
        let mut doc: ConfigDocument =
            serde_json::from_str(r#"{"usuarios": {"admin": {"senha": "pw", "admin": false}}}"#)
                .unwrap();
        assert!(doc.normalize());
        let admin = doc.user(ADMIN_USER).unwrap();
        assert_eq!(admin.password_hash, "pw");
        assert!(admin.is_admin);
    }

    #[test]
    fn test_wire_field_names() {
        let mut doc = ConfigDocument::default();
        doc.users.insert(
            "joão".into(),
            UserRecord {
                password_hash: "h".into(),
                agent_id: "42".into(),
                is_admin: false,
            },
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("version").is_none());
        assert_eq!(value["usuarios"]["joão"]["senha"], "h");
        assert_eq!(value["usuarios"]["joão"]["agent_id"], "42");
        assert_eq!(value["usuarios"]["joão"]["admin"], false);
        assert_eq!(value["lang"], DEFAULT_LANG);

        let server = ConfigDocument::initial_server();
        let value = serde_json::to_value(&server).unwrap();
        assert_eq!(value["version"], 1);
    }

    #[test]
    fn test_missing_user_fields_default() {
        let doc: ConfigDocument =
            serde_json::from_str(r#"{"usuarios": {"ana": {}}}"#).unwrap();
        let ana = doc.user("ana").unwrap();
        assert!(!ana.is_admin);
        assert!(!ana.has_agent_id());
    }
}
