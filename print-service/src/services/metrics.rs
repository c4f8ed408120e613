//! Prometheus export for the print pipeline.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the global Prometheus recorder on first call; later calls return
/// the existing handle. Must run before anything is recorded.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("failed to install Prometheus recorder");

        describe_counter!(
            "print_requests_total",
            "Finished /print requests, labelled by outcome"
        );
        describe_histogram!(
            "print_pipeline_duration_seconds",
            Unit::Seconds,
            "Render, convert and print time per validated request"
        );
        describe_counter!(
            "print_artifacts_reaped_total",
            "Stale artifacts deleted by the reaper"
        );

        handle
    })
}

/// Current metrics in Prometheus text format, for `/metrics`.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Counts one finished `/print` request by outcome (`success` or an error kind).
pub fn record_print_outcome(outcome: &'static str) {
    metrics::counter!("print_requests_total", "outcome" => outcome).increment(1);
}
