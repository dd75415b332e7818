//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_generate_requests_total` (counter): generation requests by status
//! - `proxy_generate_duration_seconds` (histogram): latency by status
//!
//! # Design Decisions
//! - Labels limited to the response status code
//! - Without an installed exporter the macros record into a no-op recorder

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

pub const REQUESTS_TOTAL: &str = "proxy_generate_requests_total";
pub const REQUEST_DURATION: &str = "proxy_generate_duration_seconds";

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished generation request.
pub fn record_generation(status: StatusCode, start_time: Instant) {
    let status = status.as_u16().to_string();
    metrics::counter!(REQUESTS_TOTAL, "status" => status.clone()).increment(1);
    metrics::histogram!(REQUEST_DURATION, "status" => status)
        .record(start_time.elapsed().as_secs_f64());
}
