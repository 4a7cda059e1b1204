//! Configuration document model and merge rules.
//!
//! # Data Flow
//! ```text
//! local file ──► ConfigDocument ──┐
//!                                 ├─► merge::overlay ──► merged view (client)
//! GET /client-config ─► Patch ────┘
//!
//! PUT body ─► DocumentPatch ─► merge::secure_merge(stored) ─► version + 1 (server)
//! ```
//!
//! # Invariants
//! - After `normalize`, `usuarios["admin"]` exists with `admin = true`
//! - `version` is only ever advanced by the server

pub mod merge;
pub mod patch;
pub mod schema;

pub use merge::{overlay, secure_merge};
pub use patch::{DocumentPatch, WriteSummary};
pub use schema::{ConfigDocument, UserRecord, ADMIN_USER, DEFAULT_LANG};
