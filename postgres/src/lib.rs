//! `PostgreSQL` storage for todo items.
//!
//! Provides [`PostgresTodoRepository`], an implementation of
//! [`todo::TodoRepository`] on a single `todos` table, together with the
//! embedded migrations and the seed rows used by fresh installs.
//!
//! Every repository call is exactly one SQL statement, so concurrent updates
//! and deletes of one row are serialised by the database.
//!
//! # Example
//!
//! ```no_run
//! use todo::{NewTodo, TodoRepository};
//! use todome_postgres::{PoolConfig, PostgresTodoRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = todome_postgres::connect("postgres://localhost/todome", &PoolConfig::default()).await?;
//! let repo = PostgresTodoRepository::new(pool);
//! repo.migrate().await?;
//!
//! let todo = repo.create(NewTodo::new("Buy milk")?).await?;
//! println!("created #{}", todo.id);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use todo::TodoError;

mod repository;

pub use repository::{PostgresTodoRepository, SEED_TODOS};

/// Connection pool settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// How long to wait for a connection
    pub connect_timeout: Duration,
    /// How long an unused connection is kept
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// Opens a connection pool
///
/// # Errors
///
/// Returns [`TodoError::Storage`] if the database cannot be reached.
pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<PgPool, TodoError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(database_url)
        .await
        .map_err(|e| TodoError::Storage(format!("Failed to connect: {e}")))?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database connection pool ready"
    );
    Ok(pool)
}
