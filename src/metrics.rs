//! Prometheus metrics for request, store and peer tracking.
//!
//! This module provides metrics for:
//! - HTTP requests per route
//! - Store operation latency and failures
//! - Items written
//! - Peer request latency and failures

use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Store operation latency metric name.
pub const METRIC_STORE_LATENCY: &str = "store_operation_latency_ms";
/// Store errors counter metric name.
pub const METRIC_STORE_ERRORS: &str = "store_errors_total";
/// Items written counter metric name.
pub const METRIC_ITEMS_WRITTEN: &str = "items_written_total";
/// Peer request latency metric name.
pub const METRIC_PEER_LATENCY: &str = "peer_request_latency_ms";
/// Peer errors counter metric name.
pub const METRIC_PEER_ERRORS: &str = "peer_errors_total";

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Render the Prometheus exposition, or 404 when no recorder is installed.
pub fn exposition(handle: Option<&PrometheusHandle>) -> Response {
    match handle {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests by route");
    describe_histogram!(
        METRIC_STORE_LATENCY,
        "Item store operation latency in milliseconds"
    );
    describe_counter!(METRIC_STORE_ERRORS, "Total number of failed store operations");
    describe_counter!(METRIC_ITEMS_WRITTEN, "Total number of items written");
    describe_histogram!(METRIC_PEER_LATENCY, "Peer request latency in milliseconds");
    describe_counter!(METRIC_PEER_ERRORS, "Total number of failed peer requests");

    debug!("Metrics initialized");
}

/// Increment the request counter for a route.
pub fn inc_http_requests(route: &'static str) {
    counter!(METRIC_HTTP_REQUESTS, "route" => route).increment(1);
}

/// Increment the store error counter.
pub fn inc_store_errors(operation: &'static str, kind: &str) {
    counter!(METRIC_STORE_ERRORS, "op" => operation, "kind" => kind.to_string()).increment(1);
}

/// Increment the items written counter.
pub fn inc_items_written() {
    counter!(METRIC_ITEMS_WRITTEN).increment(1);
}

/// Increment the peer error counter.
pub fn inc_peer_errors(kind: &'static str) {
    counter!(METRIC_PEER_ERRORS, "kind" => kind).increment(1);
}

/// Record peer request latency.
pub fn record_peer_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_PEER_LATENCY).record(latency_ms);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
    operation: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric and operation label.
    pub fn new(metric_name: &'static str, operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
            operation,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.elapsed_ms();
        histogram!(self.metric_name, "op" => self.operation).record(latency_ms);
    }
}

/// Create a latency timer for a store operation.
pub fn timer_store(operation: &'static str) -> LatencyTimer {
    LatencyTimer::new(METRIC_STORE_LATENCY, operation)
}
