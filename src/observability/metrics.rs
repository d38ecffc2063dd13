//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devnull_requests_total` (counter): handled requests by method, status
//! - `devnull_request_duration_seconds` (histogram): end-to-end latency, including the injected wait
//! - `devnull_http_client_in_flight_requests` (gauge): outbound calls in progress
//! - `devnull_http_client_requests_total` (counter): outbound calls by code, method
//! - `devnull_http_client_request_duration_seconds` (histogram): outbound call latency
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "devnull_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "devnull_request_duration_seconds";
pub const CLIENT_IN_FLIGHT_REQUESTS: &str = "devnull_http_client_in_flight_requests";
pub const CLIENT_REQUESTS_TOTAL: &str = "devnull_http_client_requests_total";
pub const CLIENT_REQUEST_DURATION_SECONDS: &str = "devnull_http_client_request_duration_seconds";

/// Install the Prometheus recorder and serve the scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled inbound request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(REQUEST_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
}

/// Record one outbound call. `code` is the status code or `error`.
pub fn record_client_request(method: &str, code: &str, start: Instant) {
    counter!(
        CLIENT_REQUESTS_TOTAL,
        "code" => code.to_string(),
        "method" => method.to_string()
    )
    .increment(1);
    histogram!(CLIENT_REQUEST_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
}

/// Counts an outbound call as in flight until dropped.
#[derive(Debug)]
pub struct InFlightGuard(());

impl InFlightGuard {
    pub fn acquire() -> Self {
        gauge!(CLIENT_IN_FLIGHT_REQUESTS).increment(1.0);
        Self(())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(CLIENT_IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}
