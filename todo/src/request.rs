//! JSON request and response bodies of the todo API.
//!
//! Request fields are kept as loosely typed as the wire allows so that
//! [`validate`](CreateTodoRequest::validate) can report every malformed value
//! as a [`TodoError::Validation`] instead of a deserialization failure.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TodoError};
use crate::types::{NewTodo, TodoId, TodoPatch};
use crate::validation::{parse_due_date, parse_priority, validate_content};

/// Body of `POST /api/todos`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    /// Required, non-empty
    #[serde(default)]
    pub content: Option<String>,
    /// Optional due date text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_date: Option<String>,
    /// `high`, `medium` or `low`; absent means `medium`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl CreateTodoRequest {
    /// Validates the body into a [`NewTodo`]
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for missing or blank content, an
    /// unparseable due date, or an unknown priority.
    pub fn validate(&self) -> Result<NewTodo> {
        let content = self
            .content
            .as_deref()
            .ok_or_else(|| TodoError::Validation("content is required".to_string()))?;

        Ok(NewTodo {
            content: validate_content(content)?,
            submit_date: match self.submit_date.as_deref() {
                Some(raw) => parse_due_date(raw)?,
                None => None,
            },
            priority: parse_priority(self.priority.as_deref())?,
        })
    }
}

impl From<&NewTodo> for CreateTodoRequest {
    fn from(todo: &NewTodo) -> Self {
        Self {
            content: Some(todo.content.clone()),
            submit_date: todo.submit_date.map(|d| d.to_rfc3339()),
            priority: Some(todo.priority.to_string()),
        }
    }
}

/// Body of `PATCH /api/todos`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    /// Item to update
    #[serde(default)]
    pub id: Option<i32>,
    /// New completion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickonoff: Option<bool>,
    /// New content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UpdateTodoRequest {
    /// Builds the body for updating `id` with `patch`
    #[must_use]
    pub fn new(id: TodoId, patch: &TodoPatch) -> Self {
        Self {
            id: Some(id.get()),
            tickonoff: patch.completed,
            content: patch.content.clone(),
        }
    }

    /// Validates the body into an id and a patch
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a missing or non-positive id, or
    /// blank content.
    pub fn validate(&self) -> Result<(TodoId, TodoPatch)> {
        let id = required_id(self.id)?;
        let content = self.content.as_deref().map(validate_content).transpose()?;
        Ok((
            id,
            TodoPatch {
                completed: self.tickonoff,
                content,
            },
        ))
    }
}

/// Body of `DELETE /api/todos`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoRequest {
    /// Item to delete
    #[serde(default)]
    pub id: Option<i32>,
}

impl DeleteTodoRequest {
    /// Builds the body for deleting `id`
    #[must_use]
    pub const fn new(id: TodoId) -> Self {
        Self { id: Some(id.get()) }
    }

    /// Validates the body into an id
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for a missing or non-positive id.
    pub fn validate(&self) -> Result<TodoId> {
        required_id(self.id)
    }
}

/// Response of `DELETE /api/todos`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always `true` on success
    pub success: bool,
}

fn required_id(id: Option<i32>) -> Result<TodoId> {
    match id {
        Some(id) if id > 0 => Ok(TodoId::new(id)),
        Some(id) => Err(TodoError::Validation(format!("invalid id {id}"))),
        None => Err(TodoError::Validation("id is required".to_string())),
    }
}
