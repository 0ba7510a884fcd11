//! Prometheus metrics for observability and monitoring.
//!
//! Components record through the `metrics` facade; nothing is exported until
//! [`install_recorder`] has been called, usually once from the server binary.
//!
//! ```rust,no_run
//! use todome_runtime::metrics::install_recorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = install_recorder()?;
//! println!("{}", handle.render());
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Latency buckets shared by every `*_duration_seconds` histogram.
const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Install the Prometheus recorder as the global metrics recorder.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            DURATION_BUCKETS,
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_metrics();
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!("store_actions_total", "Actions processed by stores");
    describe_counter!(
        "store_actions_rejected_total",
        "Actions rejected because the store was shutting down"
    );
    describe_counter!("store_effects_total", "Effects started, by effect type");
    describe_histogram!(
        "store_reducer_duration_seconds",
        "Time spent inside reducers"
    );
    describe_counter!(
        "todo_operations_total",
        "Todo API operations, by operation and outcome"
    );
    describe_histogram!(
        "todo_operation_duration_seconds",
        "Latency of todo API operations, by operation"
    );
    describe_counter!(
        "todo_store_errors_total",
        "Failed database statements, by operation"
    );
}
