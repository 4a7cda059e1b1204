//! Shared configuration sync for Movidesk desk agents.

pub mod config;
pub mod credentials;
pub mod document;
pub mod error;
pub mod i18n;
pub mod lifecycle;
pub mod observability;
pub mod remote;
pub mod server;
pub mod session;
pub mod store;
pub mod timelog;

pub use config::{ClientSettings, ServerSettings};
pub use document::{ConfigDocument, DocumentPatch, UserRecord};
pub use error::{ErrorKind, SyncError, SyncResult};
pub use lifecycle::Shutdown;
pub use server::ConfigServer;
pub use session::ConfigHandle;
