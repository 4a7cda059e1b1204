//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_fetch_total` (counter): client fetches by outcome (fresh, cached, unavailable)
//! - `config_publish_total` (counter): client publishes by outcome
//! - `config_writes_total` (counter): accepted server writes
//! - `config_writes_rejected_total` (counter): server writes refused, by reason
//! - `config_document_version` (gauge): last persisted server version

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus exporter. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_fetch(outcome: &'static str) {
    counter!("config_fetch_total", "outcome" => outcome).increment(1);
}

pub fn record_publish(outcome: &'static str) {
    counter!("config_publish_total", "outcome" => outcome).increment(1);
}

pub fn record_write(version: u64) {
    counter!("config_writes_total").increment(1);
    gauge!("config_document_version").set(version as f64);
}

pub fn record_rejected_write(reason: &'static str) {
    counter!("config_writes_rejected_total", "reason" => reason).increment(1);
}
