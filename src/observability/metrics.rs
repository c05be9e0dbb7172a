//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route, method, status, outcome
//! - `proxy_request_duration_seconds` (histogram): latency by route
//! - `proxy_backend_unreachable_total` (counter): failed backend calls by route
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::{Method, StatusCode};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("proxy_requests_total", "Inbound API requests by terminal outcome");
    describe_histogram!(
        "proxy_request_duration_seconds",
        Unit::Seconds,
        "Time from request arrival to response"
    );
    describe_counter!(
        "proxy_backend_unreachable_total",
        "Backend calls that failed or returned something other than JSON"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(
    route: &'static str,
    method: &Method,
    status: StatusCode,
    outcome: &'static str,
    start: Instant,
) {
    counter!(
        "proxy_requests_total",
        "route" => route,
        "method" => method_label(method),
        "status" => status.as_u16().to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!("proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Standard methods keep their name; extension methods share one label.
fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "OPTIONS" => "OPTIONS",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "OTHER",
    }
}

pub fn record_backend_unreachable(route: &'static str) {
    counter!("proxy_backend_unreachable_total", "route" => route).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_methods_share_a_label() {
        assert_eq!(method_label(&Method::PATCH), "PATCH");
        assert_eq!(method_label(&Method::from_bytes(b"PURGE").unwrap()), "OTHER");
        assert_eq!(method_label(&Method::from_bytes(b"get").unwrap()), "OTHER");
    }
}
