//! Todo API handlers.
//!
//! Each handler validates its input, performs exactly one repository call
//! and maps the outcome onto HTTP. All routes live on `/api/todos`; the
//! method selects the operation.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::time::Instant;
use todo::{
    CreateTodoRequest, DeleteResponse, DeleteTodoRequest, TodoItem, TodoRepository,
    UpdateTodoRequest,
};

use crate::error::AppError;
use crate::extractors::RequestId;
use crate::state::AppState;
use crate::WebResult;

/// Counts an operation and records its latency
fn record<T>(operation: &'static str, start: Instant, result: &WebResult<T>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(error) if error.status().is_client_error() => "rejected",
        Err(_) => "error",
    };
    metrics::counter!("todo_operations_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("todo_operation_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// List all todos, oldest first.
///
/// ```text
/// GET /api/todos
/// ```
#[tracing::instrument(skip_all)]
pub async fn list_todos<R>(
    State(state): State<AppState<R>>,
) -> WebResult<Json<Vec<TodoItem>>>
where
    R: TodoRepository + 'static,
{
    let start = Instant::now();
    let result = state.repository().list().await.map_err(AppError::from);
    record("list", start, &result);

    let todos = result?;
    tracing::debug!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

/// Create a todo.
///
/// ```text
/// POST /api/todos
/// {"content": "Buy milk", "submitDate": "2024-10-01", "priority": "low"}
/// ```
///
/// Returns 201 with the stored item.
#[tracing::instrument(skip_all)]
pub async fn create_todo<R>(
    State(state): State<AppState<R>>,
    request_id: RequestId,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> WebResult<(StatusCode, Json<TodoItem>)>
where
    R: TodoRepository + 'static,
{
    let start = Instant::now();
    let result = async {
        let Json(request) = payload?;
        let todo = request.validate()?;
        Ok::<_, AppError>(state.repository().create(todo).await?)
    }
    .await;
    record("create", start, &result);

    let todo = result?;
    tracing::info!(%request_id, id = %todo.id, priority = %todo.priority, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Update the completion flag and/or content of a todo.
///
/// ```text
/// PATCH /api/todos
/// {"id": 1, "tickonoff": true}
/// ```
///
/// Returns 404 if the id does not exist.
#[tracing::instrument(skip_all)]
pub async fn update_todo<R>(
    State(state): State<AppState<R>>,
    request_id: RequestId,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> WebResult<Json<TodoItem>>
where
    R: TodoRepository + 'static,
{
    let start = Instant::now();
    let result = async {
        let Json(request) = payload?;
        let (id, patch) = request.validate()?;
        Ok::<_, AppError>(state.repository().update(id, patch).await?)
    }
    .await;
    record("update", start, &result);

    let todo = result?;
    tracing::info!(%request_id, id = %todo.id, completed = todo.completed, "Todo updated");
    Ok(Json(todo))
}

/// Delete a todo.
///
/// ```text
/// DELETE /api/todos
/// {"id": 1}
/// ```
///
/// Deleting an id that does not exist still succeeds.
#[tracing::instrument(skip_all)]
pub async fn delete_todo<R>(
    State(state): State<AppState<R>>,
    request_id: RequestId,
    payload: Result<Json<DeleteTodoRequest>, JsonRejection>,
) -> WebResult<Json<DeleteResponse>>
where
    R: TodoRepository + 'static,
{
    let start = Instant::now();
    let result = async {
        let Json(request) = payload?;
        let id = request.validate()?;
        Ok::<_, AppError>((id, state.repository().delete(id).await?))
    }
    .await;
    record("delete", start, &result);

    let (id, removed) = result?;
    tracing::info!(%request_id, %id, removed, "Todo deleted");
    Ok(Json(DeleteResponse { success: true }))
}
