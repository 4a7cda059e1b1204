//! Error taxonomy shared by the client and server halves.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input caught before any I/O.
    Validation,
    /// Network or disk failure; retrying later may succeed.
    Transient,
    /// Missing, rejected or unconfigured credentials.
    Authorization,
    /// A stored or received document could not be decoded.
    Corruption,
}

/// Errors produced by configuration sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Input rejected at the edit or form boundary.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unknown user or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// No remote configuration URL is configured.
    #[error("no remote configuration endpoint configured")]
    NoEndpoint,

    /// No admin key file could be found.
    #[error("admin key not found")]
    AdminKeyMissing,

    /// The server answered 401 to a write.
    #[error("admin key rejected by server: {0}")]
    KeyRejected(String),

    /// The server answered with an unexpected status.
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// Transport failure, including timeouts.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local file system failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document that should be JSON was not.
    #[error("corrupt document: {0}")]
    Corrupt(String),
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Validation(_) => ErrorKind::Validation,
            SyncError::InvalidCredentials
            | SyncError::NoEndpoint
            | SyncError::AdminKeyMissing
            | SyncError::KeyRejected(_) => ErrorKind::Authorization,
            SyncError::Server { .. } | SyncError::Network(_) | SyncError::Io { .. } => {
                ErrorKind::Transient
            }
            SyncError::Corrupt(_) => ErrorKind::Corruption,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
