//! Per-request access log: method, path, status, latency.

use std::time::Duration;

use tracing::{info, warn};

/// Emits one event for a completed request. 5xx responses log at `warn`.
pub(crate) fn record(method: &str, path: &str, status: u16, elapsed: Duration) {
    let latency_ms = elapsed.as_secs_f64() * 1000.0;
    if status >= 500 {
        warn!(%method, %path, status, latency_ms, "request failed");
    } else {
        info!(%method, %path, status, latency_ms, "request");
    }
}
