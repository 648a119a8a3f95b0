//! Metrics collection and exposition.
//!
//! # Metrics
//! - `circuit_breaker_calls_total` (counter): calls by circuit and outcome
//!   (`success`, `failure`, `rejected`)
//! - `circuit_breaker_consecutive_failures` (gauge): current failure streak
//! - `debounce_calls_total` (counter): calls by circuit and cache result
//!   (`hit`, `miss`)
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no-ops until a recorder is installed
//! - Prometheus exporter is opt-in and owned by the binary

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a breaker call that reached the wrapped circuit.
pub fn record_breaker_outcome(circuit: &str, success: bool, consecutive_failures: u32) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!(
        "circuit_breaker_calls_total",
        "circuit" => circuit.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::gauge!(
        "circuit_breaker_consecutive_failures",
        "circuit" => circuit.to_string()
    )
    .set(f64::from(consecutive_failures));
}

/// Record a call rejected at the breaker gate.
pub fn record_breaker_rejected(circuit: &str) {
    ::metrics::counter!(
        "circuit_breaker_calls_total",
        "circuit" => circuit.to_string(),
        "outcome" => "rejected"
    )
    .increment(1);
}

/// Record whether a debounced call was served from cache.
pub fn record_debounce(circuit: &str, hit: bool) {
    let cache = if hit { "hit" } else { "miss" };
    ::metrics::counter!(
        "debounce_calls_total",
        "circuit" => circuit.to_string(),
        "cache" => cache
    )
    .increment(1);
}
