//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define aggregator metrics (requests, latency, downstream outcomes, degradation)
//! - Expose Prometheus-compatible metrics endpoint
//! - Track breaker state and API version traffic
//!
//! # Metrics
//! - `aggregator_requests_total` (counter): inbound requests by route, status
//! - `aggregator_request_duration_seconds` (histogram): inbound latency by route
//! - `aggregator_downstream_calls_total` (counter): calls by service, outcome
//! - `aggregator_downstream_duration_seconds` (histogram): call latency by service
//! - `aggregator_degraded_total` (counter): degraded responses by strategy
//! - `aggregator_breaker_state` (gauge): 0=closed, 1=open, 2=half-open
//! - `aggregator_version_hits_total` (counter): hits by API version
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so library users and
//!   tests pay nothing
//! - Labels for route, service, strategy and outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::resilience::BreakerState;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "aggregator_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("aggregator_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_downstream_call(service: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "aggregator_downstream_calls_total",
        "service" => service,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("aggregator_downstream_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_degraded(strategy: &'static str) {
    metrics::counter!("aggregator_degraded_total", "strategy" => strategy).increment(1);
}

pub fn record_breaker_state(dependency: &str, state: BreakerState) {
    metrics::gauge!("aggregator_breaker_state", "dependency" => dependency.to_string())
        .set(state.as_gauge());
}

pub fn record_version_hit(version: &'static str) {
    metrics::counter!("aggregator_version_hits_total", "version" => version).increment(1);
}
