//! Structured logging configuration.
//!
//! Library crates log through the `log` facade; `init` bridges those records
//! into the tracing subscriber so everything shares one output.

use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,tower_http=warn";

/// Initialize structured logging
///
/// Log levels are configurable through the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use pa_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a completed API request
pub fn log_api_request(request_id: &str, method: &str, path: &str, status: u16, elapsed: Duration) {
    let duration_ms = elapsed.as_secs_f64() * 1_000.0;

    if status >= 500 {
        tracing::error!(request_id, method, path, status, duration_ms, "Request failed");
    } else if status >= 400 {
        tracing::warn!(request_id, method, path, status, duration_ms, "Request rejected");
    } else {
        tracing::info!(request_id, method, path, status, duration_ms, "Request completed");
    }
}

/// Log one pass of the schedule clock
pub fn log_clock_pass(transitions: usize, archived: usize, tournaments: usize) {
    if transitions > 0 || archived > 0 {
        tracing::info!(transitions, archived, tournaments, "Schedule clock applied transitions");
    } else {
        tracing::trace!(tournaments, "Schedule clock idle");
    }
}
