//! # Todo-me Runtime
//!
//! The Store runtime that coordinates reducer execution and effect handling.
//!
//! - **Store**: owns state, runs the reducer, executes effects
//! - **Feedback loop**: actions produced by effects are sent back into the
//!   reducer
//! - **`EffectHandle`**: lets callers wait until the effects of one action
//!   (including the feedback action they produce) have finished
//!
//! ## Example
//!
//! ```ignore
//! use todome_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let mut handle = store.send(Action::Load).await?;
//! handle.wait().await;
//!
//! let count = store.state(|s| s.items.len()).await;
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use todome_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{watch, RwLock};

/// Prometheus metrics for observability
pub mod metrics;

pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for effects to complete
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Health check status levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Component is fully operational
    Healthy,

    /// Component is not operational
    Unhealthy,
}

impl HealthStatus {
    /// Check if status is unhealthy
    #[must_use]
    pub const fn is_unhealthy(self) -> bool {
        matches!(self, Self::Unhealthy)
    }
}

/// Health check result for a component
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    /// Name of the component being checked
    pub component: String,

    /// Current health status
    pub status: HealthStatus,

    /// Optional message providing details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Optional metadata (e.g., latency, pending effects)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<(String, String)>,
}

impl HealthCheck {
    /// Create a healthy check result
    #[must_use]
    pub fn healthy(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Healthy,
            message: None,
            metadata: Vec::new(),
        }
    }

    /// Create an unhealthy check result
    #[must_use]
    pub fn unhealthy(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            metadata: Vec::new(),
        }
    }

    /// Add metadata to the health check
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send`]. The handle completes once every effect the
/// action spawned has finished, which includes reducing the action an effect
/// fed back.
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };
        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Number of effects still running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, so nothing is left running.
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop,
/// even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration,
        Effect, EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreError,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// State lives behind a `RwLock`; the reducer runs while holding the write
    /// lock, so concurrent `send` calls serialise at the reducer. Effects run
    /// in spawned tasks.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Initiate graceful shutdown of the store
        ///
        /// Rejects new actions, then waits for running effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating store shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer under the write lock, then starts the returned
        /// effects. Returns once the effects are started, not finished; await
        /// the [`EffectHandle`] to wait for them.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store_actions_rejected_total").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store_actions_total").increment(1);
            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                let start = std::time::Instant::now();
                let effects = self
                    .reducer
                    .reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store_reducer_duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                effects
            };

            tracing::trace!(effects = effects.len(), "Reducer completed");
            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok(handle)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => {
                    metrics::counter!("store_effects_total", "type" => "future").increment(1);
                    let guards = self.track(tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guards = guards;
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    metrics::counter!("store_effects_total", "type" => "delay").increment(1);
                    let guards = self.track(tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guards = guards;
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    });
                },
            }
        }

        fn track(&self, tracking: &EffectTracking) -> (DecrementGuard, AtomicCounterGuard) {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            (
                DecrementGuard(tracking.clone()),
                AtomicCounterGuard(Arc::clone(&self.pending_effects)),
            )
        }

        async fn feed_back(&self, action: A) {
            if let Err(error) = self.send(action).await {
                tracing::debug!(%error, "Dropped action produced by effect");
            }
        }
    }
}
