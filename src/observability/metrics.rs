//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, endpoint
//! - `proxy_request_duration_seconds` (histogram): latency by method, endpoint
//! - `proxy_no_endpoint_available_total` (counter): requests answered 503
//! - `proxy_rewrite_fallback_total` (counter): bodies passed through unrewritten

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, endpoint: &str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "proxy_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_no_endpoint() {
    metrics::counter!("proxy_no_endpoint_available_total").increment(1);
}

pub fn record_rewrite_fallback() {
    metrics::counter!("proxy_rewrite_fallback_total").increment(1);
}
