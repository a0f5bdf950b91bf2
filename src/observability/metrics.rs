//! Metrics collection and exposition.
//!
//! # Metrics
//! - `badge_requests_total` (counter): API requests by route and outcome
//! - `badge_attestations_signed_total` (counter): delegated signatures issued
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one API request.
pub fn record_request(route: &'static str, outcome: &'static str) {
    ::metrics::counter!("badge_requests_total", "route" => route, "outcome" => outcome).increment(1);
}

/// Count one signed delegated attestation.
pub fn record_attestation_signed() {
    ::metrics::counter!("badge_attestations_signed_total").increment(1);
}
