//! [`TodoRepository`] over the `todos` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use todo::{NewTodo, Result, TodoError, TodoId, TodoItem, TodoPatch, TodoRepository};

/// Rows inserted by [`PostgresTodoRepository::seed`]
pub const SEED_TODOS: [&str; 2] = ["First todo", "Second todo"];

/// Column list shared by every statement returning rows
const COLUMNS: &str = "id, content, submit_date, created_at, tickonoff, priority";

/// Postgres check constraint violation
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id: i32,
    content: String,
    submit_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    tickonoff: bool,
    priority: String,
}

impl TryFrom<TodoRow> for TodoItem {
    type Error = TodoError;

    fn try_from(row: TodoRow) -> Result<Self> {
        let priority = row.priority.parse().map_err(|_| {
            TodoError::Storage(format!(
                "Invalid priority {:?} stored for todo {}",
                row.priority, row.id
            ))
        })?;

        Ok(Self {
            id: TodoId::new(row.id),
            content: row.content,
            submit_date: row.submit_date,
            created_at: row.created_at,
            completed: row.tickonoff,
            priority,
        })
    }
}

/// Maps a driver error, keeping constraint violations as validation errors
fn storage_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> TodoError {
    move |error| {
        metrics::counter!("todo_store_errors_total", "operation" => operation).increment(1);
        match &error {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(CHECK_VIOLATION) => {
                TodoError::Validation(format!("Rejected by store: {}", db.message()))
            },
            _ => TodoError::Storage(format!("Failed to {operation} todo: {error}")),
        }
    }
}

/// `PostgreSQL` todo repository
#[derive(Clone, Debug)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// Wraps an existing pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| TodoError::Storage(format!("Migration failed: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Inserts the starter rows if the table is empty
    ///
    /// A single statement; returns the inserted rows, or nothing if the table
    /// already held todos.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if the query fails.
    pub async fn seed(&self) -> Result<Vec<TodoItem>> {
        let rows: Vec<TodoRow> = sqlx::query_as(&format!(
            "INSERT INTO todos (content) \
             SELECT content FROM UNNEST($1::text[]) WITH ORDINALITY AS seed(content, n) \
             WHERE NOT EXISTS (SELECT 1 FROM todos) \
             ORDER BY n \
             RETURNING {COLUMNS}"
        ))
        .bind(&SEED_TODOS[..])
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("seed"))?;

        let mut inserted = rows
            .into_iter()
            .map(TodoItem::try_from)
            .collect::<Result<Vec<_>>>()?;
        inserted.sort_by(TodoItem::list_order);
        tracing::info!(inserted = inserted.len(), "Seeded todos");
        Ok(inserted)
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl TodoRepository for PostgresTodoRepository {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<TodoItem>> {
        let rows: Vec<TodoRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM todos ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("list"))?;

        rows.into_iter().map(TodoItem::try_from).collect()
    }

    #[tracing::instrument(skip(self, todo), fields(priority = %todo.priority))]
    async fn create(&self, todo: NewTodo) -> Result<TodoItem> {
        let row: TodoRow = sqlx::query_as(&format!(
            "INSERT INTO todos (content, submit_date, priority) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(&todo.content)
        .bind(todo.submit_date)
        .bind(todo.priority.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("create"))?;

        tracing::debug!(id = row.id, "Todo created");
        TodoItem::try_from(row)
    }

    #[tracing::instrument(skip(self, patch), fields(%id))]
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<TodoItem> {
        let row: Option<TodoRow> = sqlx::query_as(&format!(
            "UPDATE todos SET tickonoff = COALESCE($2, tickonoff), \
             content = COALESCE($3, content) WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id.get())
        .bind(patch.completed)
        .bind(patch.content.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error("update"))?;

        row.ok_or(TodoError::NotFound(id))?.try_into()
    }

    #[tracing::instrument(skip(self), fields(%id))]
    async fn delete(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(storage_error("delete"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        let now: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TodoError::Storage(format!("Database unreachable: {e}")))?;
        tracing::trace!(%now, "Database ping");
        Ok(())
    }
}
