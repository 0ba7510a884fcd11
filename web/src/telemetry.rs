//! Tracing subscriber set-up shared by the binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
