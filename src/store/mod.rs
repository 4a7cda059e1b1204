//! On-disk JSON documents.
//!
//! # Data Flow
//! ```text
//! probe_json(path) ─► DocumentState::{Absent, Corrupt, Valid}
//!                          │
//!   LocalConfigStore::load ┘ ─► normalize ─► migrate passwords ─► persist if changed
//!
//! save ─► normalize ─► migrate ─► atomic::write_json (temp file + rename)
//! ```
//!
//! # Constraints
//! - A corrupt file is logged and treated like a missing one
//! - Writers never truncate the target in place

pub mod atomic;
pub mod local;

use serde::de::DeserializeOwned;
use std::path::Path;

pub use atomic::{to_pretty_json, write_atomic, write_json};
pub use local::{migrate_passwords, LocalConfigStore};

/// What was found at a document path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentState<T> {
    Absent,
    /// The file exists but could not be read or decoded.
    Corrupt(String),
    Valid(T),
}

impl<T> DocumentState<T> {
    pub fn into_valid(self) -> Option<T> {
        match self {
            DocumentState::Valid(value) => Some(value),
            _ => None,
        }
    }
}

/// Read and decode a JSON file without ever failing.
pub fn probe_json<T: DeserializeOwned>(path: &Path) -> DocumentState<T> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return DocumentState::Absent,
        Err(e) => return DocumentState::Corrupt(format!("unreadable: {}", e)),
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => DocumentState::Valid(value),
        Err(e) => DocumentState::Corrupt(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ConfigDocument;

    #[test]
    fn test_probe_states() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert_eq!(probe_json::<ConfigDocument>(&path), DocumentState::Absent);

        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            probe_json::<ConfigDocument>(&path),
            DocumentState::Corrupt(_)
        ));

        std::fs::write(&path, br#"{"token": "x"}"#).unwrap();
        let doc = probe_json::<ConfigDocument>(&path).into_valid().unwrap();
        assert_eq!(doc.token, "x");
    }
}
