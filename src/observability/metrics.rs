//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (calls, latency, open connections, provisioning)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `lc_gateway_calls_total` (counter): ledger calls by function, mode, outcome
//! - `lc_gateway_call_duration_seconds` (histogram): call latency by mode
//! - `lc_gateway_open_connections` (gauge): ledger connections currently open
//! - `lc_gateway_provisioning_total` (counter): provisioning runs by kind, outcome
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Outcome labels are short error kinds, never error messages

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and serve `/metrics` on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one finished ledger call.
pub fn record_call(function: &str, mode: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "lc_gateway_calls_total",
        "function" => function.to_string(),
        "mode" => mode,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("lc_gateway_call_duration_seconds", "mode" => mode)
        .record(start.elapsed().as_secs_f64());
}

pub fn connection_opened() {
    metrics::gauge!("lc_gateway_open_connections").increment(1.0);
}

pub fn connection_closed() {
    metrics::gauge!("lc_gateway_open_connections").decrement(1.0);
}

/// Record one provisioning attempt (`kind` is "admin" or "user").
pub fn record_provisioning(kind: &'static str, outcome: &'static str) {
    metrics::counter!(
        "lc_gateway_provisioning_total",
        "kind" => kind,
        "outcome" => outcome
    )
    .increment(1);
}
