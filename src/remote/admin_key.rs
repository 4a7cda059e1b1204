//! Admin key discovery.

use std::fmt;
use std::path::PathBuf;

use crate::config::client::app_data_dir;

/// File name looked up in each candidate directory.
pub const ADMIN_KEY_FILE: &str = "admin.key";

/// The publish secret. Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminKey(String);

impl AdminKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminKey(***)")
    }
}

/// Ordered list of files that may hold the admin key.
#[derive(Debug, Clone)]
pub struct AdminKeyLocator {
    candidates: Vec<PathBuf>,
}

impl AdminKeyLocator {
    /// Per-user data directory first, then the directory of the running
    /// executable.
    pub fn standard() -> Self {
        let mut candidates = vec![app_data_dir().join(ADMIN_KEY_FILE)];
        match std::env::current_exe() {
            Ok(exe) => {
                if let Some(dir) = exe.parent() {
                    candidates.push(dir.join(ADMIN_KEY_FILE));
                }
            }
            Err(e) => tracing::debug!(error = %e, "Cannot resolve executable directory"),
        }
        Self { candidates }
    }

    pub fn from_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First non-blank key among the candidates.
    pub fn discover(&self) -> Option<AdminKey> {
        self.candidates.iter().find_map(|path| {
            let content = std::fs::read_to_string(path).ok()?;
            let key = content.trim();
            if key.is_empty() {
                tracing::debug!(path = %path.display(), "Admin key file is empty, skipping");
                return None;
            }
            tracing::debug!(path = %path.display(), "Admin key found");
            Some(AdminKey::new(key))
        })
    }
}
