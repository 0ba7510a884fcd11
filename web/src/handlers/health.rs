//! Health check and metrics endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use axum::{extract::State, http::StatusCode, Json};
use std::time::Instant;
use todo::TodoRepository;
use todome_runtime::HealthCheck;

use crate::state::AppState;

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running. Does not touch the
/// database.
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness check: can the database be reached?
///
/// - 200 OK: the repository answered a ping
/// - 503 Service Unavailable: it did not
///
/// ```text
/// GET /ready
/// ```
///
/// ```json
/// {
///   "component": "database",
///   "status": "healthy",
///   "metadata": [["latency_ms", "2"]]
/// }
/// ```
pub async fn readiness_check<R>(State(state): State<AppState<R>>) -> (StatusCode, Json<HealthCheck>)
where
    R: TodoRepository + 'static,
{
    let start = Instant::now();
    let check = match state.repository().ping().await {
        Ok(()) => HealthCheck::healthy("database"),
        Err(error) => {
            tracing::warn!(%error, "Readiness check failed");
            HealthCheck::unhealthy("database", error.to_string())
        },
    }
    .with_metadata("latency_ms", start.elapsed().as_millis().to_string());

    let status = if check.status.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status, Json(check))
}

/// Prometheus metrics in text format; 404 when metrics are disabled.
///
/// ```text
/// GET /metrics
/// ```
#[allow(clippy::unused_async)]
pub async fn metrics<R>(State(state): State<AppState<R>>) -> (StatusCode, String) {
    match state.metrics() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
