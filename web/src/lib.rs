//! HTTP surface of Todo-me.
//!
//! - **Server side**: an Axum router over any [`TodoRepository`], with
//!   request ids, HTTP tracing, optional CORS, readiness and Prometheus
//!   metrics.
//! - **Client side**: [`HttpTodoRepository`], which lets the client state
//!   controller in `todo::client` drive a remote server.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Validate** the JSON body into domain input
//! 3. **One repository call** (one SQL statement in production)
//! 4. **Map result** to a JSON response or an [`AppError`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo::InMemoryTodoRepository;
//! use todome_web::{build_router, AppState, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let state = AppState::new(Arc::new(InMemoryTodoRepository::new()));
//! let app = build_router(state, &config.server);
//!
//! let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`TodoRepository`]: todo::TodoRepository

#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod telemetry;

pub use client::HttpTodoRepository;
pub use config::Config;
pub use error::AppError;
pub use extractors::RequestId;
pub use middleware::{request_id_layer, REQUEST_ID_HEADER};
pub use router::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
