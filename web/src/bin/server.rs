//! Todo-me API server.
//!
//! Reads configuration from the environment (and `.env`), connects to
//! `PostgreSQL`, applies migrations and serves the todo API until Ctrl+C or
//! SIGTERM.

use anyhow::Context;
use std::sync::Arc;
use tokio::{signal, sync::Notify};
use todo::TodoRepository;
use todome_postgres::PostgresTodoRepository;
use todome_runtime::metrics::install_recorder;
use todome_web::{build_router, telemetry::init_tracing, AppState, Config};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing(&config.server.log_level);

    info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting Todo-me server"
    );

    let pool = todome_postgres::connect(&config.database.url, &config.database.pool_config())
        .await
        .context("Failed to connect to PostgreSQL")?;
    let repository = PostgresTodoRepository::new(pool);

    if config.database.run_migrations {
        repository
            .migrate()
            .await
            .context("Failed to run migrations")?;
        info!("Migrations applied");
    }
    repository.ping().await.context("Database is not reachable")?;

    let metrics = if config.server.metrics_enabled {
        Some(install_recorder().context("Failed to install metrics recorder")?)
    } else {
        None
    };

    let state = AppState::new(Arc::new(repository)).with_metrics(metrics);
    let app = build_router(state, &config.server);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "Listening");

    let stop = Arc::new(Notify::new());
    let mut server = tokio::spawn({
        let stop = Arc::clone(&stop);
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.notified().await })
                .await
        }
    });

    tokio::select! {
        result = &mut server => {
            result.context("Server task panicked")??;
            return Ok(());
        },
        () = shutdown_signal() => {},
    }

    stop.notify_one();
    match tokio::time::timeout(config.server.shutdown_timeout(), server).await {
        Ok(result) => result.context("Server task panicked")??,
        Err(_) => warn!(
            timeout_secs = config.server.shutdown_timeout,
            "In-flight requests did not finish before the shutdown timeout"
        ),
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
