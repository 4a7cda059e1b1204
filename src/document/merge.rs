//! Per-field merge rules.
//!
//! | field      | rule                                              |
//! |------------|---------------------------------------------------|
//! | `usuarios` | merged by username, incoming entry wins per key   |
//! | `token`    | replaced only by a non-blank value                |
//! | `lang`     | replaced only by a non-blank value                |
//! | `version`  | overlay: max of both; secure merge: current + 1   |

use super::patch::DocumentPatch;
use super::schema::ConfigDocument;

/// Combine the local document with freshly fetched remote state.
pub fn overlay(local: &ConfigDocument, remote: &DocumentPatch) -> ConfigDocument {
    let mut merged = local.clone();
    apply_shared_fields(&mut merged, remote);
    if let Some(version) = remote.version {
        merged.version = merged.version.max(version);
    }
    merged.normalize();
    merged
}

/// Server-side merge of a publish into the stored document.
///
/// The patch's own `version` is ignored; the result is always exactly one
/// revision past `current`.
pub fn secure_merge(current: &ConfigDocument, patch: &DocumentPatch) -> ConfigDocument {
    let mut merged = current.clone();
    apply_shared_fields(&mut merged, patch);
    merged.version = current.version.saturating_add(1);
    merged
}

fn apply_shared_fields(target: &mut ConfigDocument, incoming: &DocumentPatch) {
    if let Some(users) = &incoming.users {
        for (name, record) in users {
            target.users.insert(name.clone(), record.clone());
        }
    }

    if let Some(token) = non_blank(incoming.token.as_deref()) {
        target.token = token.to_string();
    }

    if let Some(lang) = non_blank(incoming.lang.as_deref()) {
        target.lang = lang.to_string();
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::schema::{UserRecord, ADMIN_USER};
    use std::collections::BTreeMap;

    fn user(agent: &str) -> UserRecord {
        UserRecord {
            password_hash: String::new(),
            agent_id: agent.into(),
            is_admin: false,
        }
    }

    fn users(entries: &[(&str, UserRecord)]) -> BTreeMap<String, UserRecord> {
        entries
            .iter()
            .map(|(name, record)| (name.to_string(), record.clone()))
            .collect()
    }

    #[test]
    fn test_overlay_keeps_local_token() {
        let mut local = ConfigDocument::default();
        local.token = "T1".into();

        for remote_token in [None, Some(""), Some("   ")] {
            let remote = DocumentPatch {
                token: remote_token.map(String::from),
                ..Default::default()
            };
            assert_eq!(overlay(&local, &remote).token, "T1");
        }
    }

    #[test]
    fn test_overlay_replaces_token_trimmed() {
        let mut local = ConfigDocument::default();
        local.token = "T1".into();
        let remote = DocumentPatch {
            token: Some("  T2 \n".into()),
            ..Default::default()
        };
        assert_eq!(overlay(&local, &remote).token, "T2");
    }

    #[test]
    fn test_overlay_merges_users() {
        let mut local = ConfigDocument::default();
        local.users.insert("alice".into(), user("A"));

        let remote = DocumentPatch {
            users: Some(users(&[("bob", user("B"))])),
            ..Default::default()
        };
        let merged = overlay(&local, &remote);
        assert_eq!(merged.user("alice"), Some(&user("A")));
        assert_eq!(merged.user("bob"), Some(&user("B")));
        assert!(merged.user(ADMIN_USER).unwrap().is_admin);

        let remote = DocumentPatch {
            users: Some(users(&[("alice", user("A2"))])),
            ..Default::default()
        };
        assert_eq!(overlay(&local, &remote).user("alice"), Some(&user("A2")));
    }

    #[test]
    fn test_overlay_restores_admin() {
        let local = ConfigDocument::default();
        let remote = DocumentPatch {
            users: Some(users(&[(ADMIN_USER, user(""))])),
            ..Default::default()
        };
        let merged = overlay(&local, &remote);
        assert!(merged.user(ADMIN_USER).unwrap().is_admin);
    }

    #[test]
    fn test_overlay_lang_and_version() {
        let mut local = ConfigDocument::default();
        local.version = 5;

        let remote = DocumentPatch {
            version: Some(3),
            lang: Some("en".into()),
            ..Default::default()
        };
        let merged = overlay(&local, &remote);
        assert_eq!(merged.lang, "en");
        assert_eq!(merged.version, 5);

        let remote = DocumentPatch {
            version: Some(7),
            lang: Some("".into()),
            ..Default::default()
        };
        let merged = overlay(&local, &remote);
        assert_eq!(merged.lang, local.lang);
        assert_eq!(merged.version, 7);
    }

    #[test]
    fn test_secure_merge_increments_version() {
        let current = ConfigDocument::initial_server();
        let patch = DocumentPatch {
            version: Some(100),
            token: Some("T".into()),
            ..Default::default()
        };
        let merged = secure_merge(&current, &patch);
        assert_eq!(merged.version, 2);
        assert_eq!(merged.token, "T");

        let again = secure_merge(&merged, &DocumentPatch::default());
        assert_eq!(again.version, 3);
        assert_eq!(again.token, "T");
    }

    #[test]
    fn test_secure_merge_preserves_unmentioned_users() {
        let mut current = ConfigDocument::initial_server();
        current.users.insert("carol".into(), user("C"));
        let patch = DocumentPatch {
            users: Some(users(&[("dave", user("D"))])),
            token: Some(String::new()),
            ..Default::default()
        };
        let merged = secure_merge(&current, &patch);
        assert_eq!(merged.users.len(), 3);
        assert_eq!(merged.token, "");
    }
}
