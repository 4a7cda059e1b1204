//! Explicitly owned client configuration.
//!
//! # Data Flow
//! ```text
//! ClientSettings ─► ConfigHandle::from_settings ─► LocalConfigStore::load
//! reload ─► load local ─► RemoteConfigClient::fetch ─► overlay ─► in-memory view
//! login / admin edits ─► mutate view ─► LocalConfigStore::save
//! publish ─► ConfigPublisher::publish(view)
//! ```

pub mod handle;

pub use handle::ConfigHandle;
