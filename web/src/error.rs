//! Error types for web handlers.
//!
//! [`AppError`] is the only error type handlers return. Domain errors are
//! mapped onto it with `?` and rendered as `{"code": ..., "message": ...}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use todo::TodoError;

/// Application error type for web handlers.
///
/// Server errors keep their cause in `source` for the logs; clients only see
/// the generic message.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState<R>>) -> Result<Json<TodoItem>, AppError> {
///     let todo = state.repository().update(id, patch).await?;
///     Ok(Json(todo))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 400 error for input that failed validation.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 502 Bad Gateway error.
    #[must_use]
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            message.into(),
            "BAD_GATEWAY".to_string(),
        )
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code (for client error handling).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        } else {
            tracing::debug!(status = %self.status, code = %self.code, message = %self.message, "Request rejected");
        }

        let body = ErrorBody {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation(message) => Self::validation(message),
            TodoError::NotFound(id) => Self::not_found("Todo", id),
            TodoError::Storage(_) => {
                Self::internal("An internal error occurred").with_source(err.into())
            },
            TodoError::Transport(_) => {
                Self::bad_gateway("Upstream service unavailable").with_source(err.into())
            },
        }
    }
}

/// Malformed JSON bodies are client errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todo::TodoId;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = AppError::from(TodoError::Validation("content must not be empty".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::from(TodoError::NotFound(TodoId::new(7)));
        assert_eq!(err.to_string(), "[NOT_FOUND] Todo with id 7 not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_error_hides_details() {
        let err = AppError::from(TodoError::Storage("connection refused".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("connection refused"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_response_body() {
        let response = AppError::validation("bad priority").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.message, "bad priority");
    }
}
