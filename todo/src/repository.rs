//! Repository seam between todo logic and storage.
//!
//! The same trait is implemented by the PostgreSQL store, the in-memory store
//! used in tests, and the HTTP client of the API, so the client controller
//! can run against any of them.

use std::future::Future;

use crate::error::Result;
use crate::types::{NewTodo, TodoId, TodoItem, TodoPatch};

/// Storage for todo items
///
/// Every method is a single, independent operation; there are no
/// multi-call transactions.
pub trait TodoRepository: Send + Sync {
    /// All items, ordered by creation time ascending (ties by id)
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is unavailable.
    fn list(&self) -> impl Future<Output = Result<Vec<TodoItem>>> + Send;

    /// Inserts an item and returns it with its assigned id and creation time
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the insert.
    fn create(&self, todo: NewTodo) -> impl Future<Output = Result<TodoItem>> + Send;

    /// Applies `patch` to one item and returns the updated item
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`](crate::TodoError::NotFound) if no item
    /// has this id.
    fn update(&self, id: TodoId, patch: TodoPatch)
    -> impl Future<Output = Result<TodoItem>> + Send;

    /// Deletes one item
    ///
    /// Deleting an id that does not exist succeeds; the returned flag tells
    /// whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is unavailable.
    fn delete(&self, id: TodoId) -> impl Future<Output = Result<bool>> + Send;

    /// Checks that the backing store is reachable
    ///
    /// # Errors
    ///
    /// Returns an error describing why the store cannot be reached.
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;
}
