//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Client and server code produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (fetch/publish/write counters, document version gauge)
//!
//! Consumers:
//!     → stderr via tracing-subscriber fmt layer
//!     → Prometheus scrape endpoint (server, when METRICS_ADDR is set)
//! ```
//!
//! # Constraints
//! - Tokens, admin keys and passwords never appear in events
//! - Metric updates without an installed recorder are no-ops

pub mod logging;
pub mod metrics;
