//! Prometheus metrics for monitoring the battle server.
//!
//! Metrics are exposed in Prometheus text format when a metrics address is
//! configured. Recording is a no-op until `init_metrics` installs a recorder.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use pa_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/api/v1/ticks", 202);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Battle Metrics
// ============================================================================

pub fn tournaments_created() {
    metrics::counter!("tournaments_created_total").increment(1);
}

/// Set the number of tournaments known to the manager.
pub fn tournaments_active(count: usize) {
    metrics::gauge!("tournaments_active").set(count as f64);
}

pub fn entries_joined(tournament_id: i64) {
    metrics::counter!("entries_joined_total", "tournament" => tournament_id.to_string())
        .increment(1);
}

/// Record a performance tick outcome (`accepted` or `rejected`).
pub fn ticks_total(outcome: &'static str) {
    metrics::counter!("performance_ticks_total", "outcome" => outcome).increment(1);
}

pub fn clock_transitions(count: usize) {
    metrics::counter!("clock_transitions_total").increment(count as u64);
}

pub fn tournaments_archived(count: usize) {
    metrics::counter!("tournaments_archived_total").increment(count as u64);
}
