//! Error taxonomy shared by every repository and the client controller.

use thiserror::Error;

use crate::types::TodoId;

/// Errors produced by todo operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Caller supplied malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// No todo item has this id
    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// The backing store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// The API could not be reached or answered unexpectedly
    #[error("Transport error: {0}")]
    Transport(String),
}

impl TodoError {
    /// Short machine-readable code used in API error bodies
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage_error",
            Self::Transport(_) => "transport_error",
        }
    }
}

/// Result alias for todo operations
pub type Result<T> = std::result::Result<T, TodoError>;
