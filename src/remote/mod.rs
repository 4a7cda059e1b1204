//! Client side of the central configuration server.
//!
//! # Data Flow
//! ```text
//! RemoteConfigClient::fetch
//!     GET url (8s) ──ok──► write raw bytes to cache ──► Fresh
//!         │ any failure
//!         └──► cache file valid? ──► Cached  /  otherwise Unavailable
//!
//! ConfigPublisher::publish
//!     endpoint? ─► AdminKeyLocator::discover ─► PUT url + X-Config-Key (10s)
//!         200 ─► WriteSummary   401 ─► KeyRejected   other ─► Server
//! ```

pub mod admin_key;
pub mod client;
pub mod publisher;

pub use admin_key::{AdminKey, AdminKeyLocator, ADMIN_KEY_FILE};
pub use client::{FetchOutcome, RemoteConfigClient};
pub use publisher::{ConfigPublisher, CONFIG_KEY_HEADER};
