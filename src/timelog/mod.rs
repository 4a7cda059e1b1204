//! Logging worked time against helpdesk tickets.
//!
//! # Data Flow
//! ```text
//! raw form strings ─► validators ─► TimeEntry::parse ─► TicketActionSubmitter::submit
//!                        │ invalid                          │
//!                        └─► SyncError::Validation          └─► PATCH tickets?token&id
//! ```
//!
//! Validation always completes before any network call.

pub mod entry;
pub mod submitter;
pub mod validators;

pub use entry::{RawTimeEntry, TimeEntry};
pub use submitter::{MovideskSubmitter, TicketActionSubmitter, MOVIDESK_API_BASE};
pub use validators::{validate_date, validate_ticket, validate_time};
