//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Generic over the repository so the same router serves `PostgreSQL` in
/// production and the in-memory repository in tests.
///
/// ```ignore
/// let state = AppState::new(Arc::new(PostgresTodoRepository::new(pool)));
/// let app = build_router(state, &config.server);
/// ```
pub struct AppState<R> {
    repository: Arc<R>,
    metrics: Option<PrometheusHandle>,
}

impl<R> AppState<R> {
    /// Create a new application state.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            metrics: None,
        }
    }

    /// Serve `/metrics` from this Prometheus handle
    #[must_use]
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// The todo repository
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// The Prometheus handle, if metrics are enabled
    #[must_use]
    pub const fn metrics(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }
}

// Manual impl: `R` itself need not be `Clone`.
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            metrics: self.metrics.clone(),
        }
    }
}
