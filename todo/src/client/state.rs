//! Client state container and the actions that drive it.

use chrono::NaiveDate;

use super::filter::{DateFilter, PriorityFilter};
use crate::request::CreateTodoRequest;
use crate::types::{TodoId, TodoItem, TodoPatch};

/// Everything the client knows about the todo list
///
/// `todos` is always kept in list order (creation time, then id).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientState {
    /// Local copy of the collection
    pub todos: Vec<TodoItem>,
    /// Active priority filter
    pub priority_filter: PriorityFilter,
    /// Active due-date filter
    pub date_filter: DateFilter,
    /// A list request is in flight
    pub loading: bool,
    /// User-visible error banner
    pub error: Option<String>,
    error_generation: u64,
}

impl ClientState {
    /// Creates an empty state with no filters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a todo by id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Number of todos held locally
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Number of completed todos, ignoring filters
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Todos passing both filters on `today`, in list order
    #[must_use]
    pub fn visible(&self, today: NaiveDate) -> Vec<&TodoItem> {
        self.todos
            .iter()
            .filter(|t| self.priority_filter.matches(t) && self.date_filter.matches(t, today))
            .collect()
    }

    /// Replaces the whole collection
    pub(crate) fn replace_all(&mut self, mut todos: Vec<TodoItem>) {
        todos.sort_by(TodoItem::list_order);
        self.todos = todos;
    }

    /// Inserts `item` at its list position, replacing any item with its id
    pub(crate) fn upsert(&mut self, item: TodoItem) {
        self.todos.retain(|t| t.id != item.id);
        let index = self
            .todos
            .partition_point(|t| t.list_order(&item).is_lt());
        self.todos.insert(index, item);
    }

    /// Replaces the item with the same id; ignored if it is gone
    pub(crate) fn replace(&mut self, item: TodoItem) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == item.id) {
            *slot = item;
        }
    }

    /// Applies `patch` to the item, returning the patch that undoes it
    pub(crate) fn patch(&mut self, id: TodoId, patch: &TodoPatch) -> Option<TodoPatch> {
        let item = self.todos.iter_mut().find(|t| t.id == id)?;
        let rollback = patch.inverse(item);
        item.apply(patch);
        Some(rollback)
    }

    pub(crate) fn remove(&mut self, id: TodoId) -> Option<TodoItem> {
        let index = self.todos.iter().position(|t| t.id == id)?;
        Some(self.todos.remove(index))
    }

    /// Shows `message` in the banner and returns its generation
    pub(crate) fn set_error(&mut self, message: String) -> u64 {
        self.error_generation += 1;
        self.error = Some(message);
        self.error_generation
    }

    /// Clears the banner if it still shows the error of `generation`
    pub(crate) fn expire_error(&mut self, generation: u64) {
        if self.error_generation == generation {
            self.error = None;
        }
    }
}

/// Inputs of the client reducer: user intents and API results
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientAction {
    // ========== Intents ==========
    /// Initial fetch of the collection
    Load,
    /// Explicit refetch of the collection
    Refresh,
    /// Create a todo from raw form input
    Create {
        /// Unvalidated form values
        request: CreateTodoRequest,
    },
    /// Flip the completion flag
    ToggleCompletion {
        /// Item to toggle
        id: TodoId,
    },
    /// Set the completion flag
    SetCompleted {
        /// Item to change
        id: TodoId,
        /// New flag
        completed: bool,
    },
    /// Replace the content
    EditContent {
        /// Item to change
        id: TodoId,
        /// New content
        content: String,
    },
    /// Remove a todo
    Delete {
        /// Item to remove
        id: TodoId,
    },
    /// Change the priority filter
    SetPriorityFilter(PriorityFilter),
    /// Change the due-date filter
    SetDateFilter(DateFilter),
    /// Clear the error banner
    DismissError,

    // ========== Results ==========
    /// The list request succeeded
    TodosLoaded {
        /// Full collection from the server
        todos: Vec<TodoItem>,
    },
    /// The list request failed
    LoadFailed {
        /// Error description
        error: String,
    },
    /// The server created an item
    TodoCreated {
        /// Server copy of the new item
        todo: TodoItem,
    },
    /// The create request failed
    CreateFailed {
        /// Error description
        error: String,
    },
    /// The server confirmed an update
    TodoUpdated {
        /// Server copy of the item
        todo: TodoItem,
    },
    /// An update failed and must be rolled back
    UpdateFailed {
        /// Item that was patched optimistically
        id: TodoId,
        /// Patch restoring the previous values
        rollback: TodoPatch,
        /// Error description
        error: String,
    },
    /// The server confirmed a delete
    TodoDeleted {
        /// Deleted item
        id: TodoId,
    },
    /// A delete failed and the item must be restored
    DeleteFailed {
        /// Item that was removed
        id: TodoId,
        /// Local copy removed optimistically, if there was one
        todo: Option<TodoItem>,
        /// Error description
        error: String,
    },
    /// The banner timer for an error ran out
    ErrorExpired {
        /// Generation of the error the timer belongs to
        generation: u64,
    },
}
