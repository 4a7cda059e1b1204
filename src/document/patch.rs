//! Partial documents exchanged with the server.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::schema::{ConfigDocument, UserRecord};

/// Any subset of a [`ConfigDocument`].
///
/// Used both for fetched remote state (which may omit fields) and for the
/// body of a publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    #[serde(rename = "usuarios", default, skip_serializing_if = "Option::is_none")]
    pub users: Option<BTreeMap<String, UserRecord>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl DocumentPatch {
    /// The fields a client is allowed to publish. `version` is left out:
    /// only the server numbers revisions.
    pub fn shared_fields(doc: &ConfigDocument) -> Self {
        Self {
            version: None,
            users: Some(doc.users.clone()),
            token: Some(doc.token.clone()),
            lang: Some(doc.lang.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.users.is_none() && self.token.is_none() && self.lang.is_none()
    }
}

impl From<ConfigDocument> for DocumentPatch {
    fn from(doc: ConfigDocument) -> Self {
        Self {
            version: Some(doc.version),
            users: Some(doc.users),
            token: Some(doc.token),
            lang: Some(doc.lang),
        }
    }
}

/// Server reply to an accepted write. Never includes the token itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WriteSummary {
    pub status: String,
    pub version: u64,
    pub usuarios_count: usize,
    pub has_token: bool,
}

impl WriteSummary {
    pub fn for_document(doc: &ConfigDocument) -> Self {
        Self {
            status: "ok".to_string(),
            version: doc.version,
            usuarios_count: doc.users.len(),
            has_token: doc.has_token(),
        }
    }
}
