//! Domain types for todo items.
//!
//! Wire names follow the JSON API: `submitDate`, `createdAt` and `tickonoff`
//! (the completion flag).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TodoError;

/// Store-assigned identifier of a todo item
///
/// Ids are positive, never reused, and never change once assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i32);

impl TodoId {
    /// Wraps a raw id
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for TodoId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority level of a todo item
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Urgent
    High,
    /// The default for new items
    #[default]
    Medium,
    /// Can wait
    Low,
}

impl Priority {
    /// All priorities, highest first
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Lowercase name as stored and sent over the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                TodoError::Validation(format!(
                    "priority must be one of high, medium, low (got {wanted:?})"
                ))
            })
    }
}

/// A single todo item as stored and returned by the API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing
    pub content: String,
    /// Optional due date
    pub submit_date: Option<DateTime<Utc>>,
    /// Set once at insert
    pub created_at: DateTime<Utc>,
    /// Whether the item is done
    #[serde(rename = "tickonoff")]
    pub completed: bool,
    /// Priority level
    pub priority: Priority,
}

impl TodoItem {
    /// Applies the fields present in `patch`
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
    }

    /// Default list order: creation time, then id
    #[must_use]
    pub fn list_order(&self, other: &Self) -> std::cmp::Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then(self.id.cmp(&other.id))
    }
}

/// Validated input for creating a todo item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    /// Non-empty, trimmed content
    pub content: String,
    /// Optional due date
    pub submit_date: Option<DateTime<Utc>>,
    /// Priority level
    pub priority: Priority,
}

impl NewTodo {
    /// New todo with no due date and default priority
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if `content` is blank.
    pub fn new(content: impl AsRef<str>) -> Result<Self, TodoError> {
        Ok(Self {
            content: crate::validation::validate_content(content.as_ref())?,
            submit_date: None,
            priority: Priority::default(),
        })
    }

    /// Sets the due date
    #[must_use]
    pub const fn due(mut self, submit_date: DateTime<Utc>) -> Self {
        self.submit_date = Some(submit_date);
        self
    }

    /// Sets the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update of a todo item; `None` fields are left untouched
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// New completion flag
    pub completed: Option<bool>,
    /// New content (already validated)
    pub content: Option<String>,
}

impl TodoPatch {
    /// Patch that only sets the completion flag
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            content: None,
        }
    }

    /// Patch that only replaces the content
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] if `content` is blank.
    pub fn content(content: impl AsRef<str>) -> Result<Self, TodoError> {
        Ok(Self {
            completed: None,
            content: Some(crate::validation::validate_content(content.as_ref())?),
        })
    }

    /// Returns `true` if the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.completed.is_none() && self.content.is_none()
    }

    /// Patch restoring the fields this patch would change on `item`
    #[must_use]
    pub fn inverse(&self, item: &TodoItem) -> Self {
        Self {
            completed: self.completed.map(|_| item.completed),
            content: self.content.as_ref().map(|_| item.content.clone()),
        }
    }
}
