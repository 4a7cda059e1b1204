//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast → ConfigServer::run stops accepting → drains → returns
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
