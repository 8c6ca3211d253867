//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Expose a Prometheus-compatible metrics endpoint
//! - Track per-service probe outcomes and latency
//!
//! # Metrics
//! - `pulsewatch_probe_total` (counter): probe outcomes by service, status
//! - `pulsewatch_probe_latency_seconds` (histogram): latency of UP probes
//! - `pulsewatch_backend_up` (gauge): 1 when the last probe was UP

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::probe::ProbeResult;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    if let Err(error) = builder.install() {
        tracing::error!(%error, "failed to install Prometheus exporter");
        return;
    }
    tracing::info!(address = %addr, "metrics exporter listening");

    metrics::describe_counter!(
        "pulsewatch_probe_total",
        "Probe outcomes by service and status"
    );
    metrics::describe_histogram!(
        "pulsewatch_probe_latency_seconds",
        "Latency of successful probes by service"
    );
    metrics::describe_gauge!(
        "pulsewatch_backend_up",
        "1 when the backend's most recent probe was UP"
    );
}

/// Record one normalized probe outcome.
pub fn record_probe(result: &ProbeResult) {
    let status = if result.status.is_up() { "up" } else { "down" };
    metrics::counter!(
        "pulsewatch_probe_total",
        "service" => result.service.clone(),
        "status" => status
    )
    .increment(1);

    metrics::gauge!("pulsewatch_backend_up", "service" => result.service.clone())
        .set(if result.status.is_up() { 1.0 } else { 0.0 });

    if let Some(latency_ms) = result.latency_ms {
        metrics::histogram!(
            "pulsewatch_probe_latency_seconds",
            "service" => result.service.clone()
        )
        .record(latency_ms as f64 / 1000.0);
    }
}
