//! Runtime settings for both binaries.
//!
//! # Data Flow
//! ```text
//! environment variables
//!     → server.rs (ServerSettings, fails on malformed numbers)
//!     → client.rs (ClientSettings, per-user data dir defaults)
//!     → passed by value to the server / session at startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty environment is a valid setup
//! - Blank variables count as unset
//! - The admin secret has no default; without it writes are refused

pub mod client;
pub mod server;

pub use client::ClientSettings;
pub use server::{ServerSettings, SettingsError};
