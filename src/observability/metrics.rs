//! Metrics collection and exposition.
//!
//! # Metrics
//! - `profile_http_requests_total` (counter): requests by method, route, status
//! - `profile_http_request_duration_seconds` (histogram): latency distribution
//! - `profile_store_operations_total` (counter): store calls by op and outcome
//! - `profile_store_operation_duration_seconds` (histogram)
//! - `profile_rate_limited_total` (counter): requests rejected with 429
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("profile_http_requests_total", &labels).increment(1);
    metrics::histogram!("profile_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a store round-trip.
pub fn record_store_operation(op: &'static str, success: bool, start: Instant) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!("profile_store_operations_total", "op" => op, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("profile_store_operation_duration_seconds", "op" => op)
        .record(start.elapsed().as_secs_f64());
}

/// Record a request rejected by the rate limiter.
pub fn record_rate_limited() {
    metrics::counter!("profile_rate_limited_total").increment(1);
}

/// Middleware recording request count and latency per matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    // Unmatched paths collapse into one label so arbitrary URLs cannot grow the series.
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
