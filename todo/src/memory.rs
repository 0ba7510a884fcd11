//! In-memory [`TodoRepository`] for tests, demos and the client controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use todome_core::environment::{Clock, SystemClock};

use crate::error::{Result, TodoError};
use crate::repository::TodoRepository;
use crate::types::{NewTodo, TodoId, TodoItem, TodoPatch};

#[derive(Debug, Default)]
struct Inner {
    last_id: i32,
    todos: Vec<TodoItem>,
}

/// Todo storage backed by a mutex-guarded vector
///
/// Ids increase monotonically and are never reused, even after deletes.
/// [`set_unavailable`](Self::set_unavailable) makes every call fail with
/// [`TodoError::Storage`], which is how tests exercise failure paths.
pub struct InMemoryTodoRepository {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
    unavailable: AtomicBool,
}

impl InMemoryTodoRepository {
    /// Empty repository stamping items with the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty repository stamping items with `clock`
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent call fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored items
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if the repository is unavailable.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.todos.len())
    }

    /// Returns `true` if nothing is stored
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Storage`] if the repository is unavailable.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TodoError::Storage("store unavailable".to_string()));
        }
        self.inner
            .lock()
            .map_err(|_| TodoError::Storage("in-memory store lock poisoned".to_string()))
    }
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<TodoItem>> {
        let mut todos = self.lock()?.todos.clone();
        todos.sort_by(TodoItem::list_order);
        Ok(todos)
    }

    async fn create(&self, todo: NewTodo) -> Result<TodoItem> {
        let mut inner = self.lock()?;
        inner.last_id += 1;

        let item = TodoItem {
            id: TodoId::new(inner.last_id),
            content: todo.content,
            submit_date: todo.submit_date,
            created_at: self.clock.now(),
            completed: false,
            priority: todo.priority,
        };
        inner.todos.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<TodoItem> {
        let mut inner = self.lock()?;
        let item = inner
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;
        item.apply(&patch);
        Ok(item.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        let mut inner = self.lock()?;
        let before = inner.todos.len();
        inner.todos.retain(|t| t.id != id);
        Ok(inner.todos.len() < before)
    }

    async fn ping(&self) -> Result<()> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use todome_testing::test_clock;

    fn repo() -> InMemoryTodoRepository {
        InMemoryTodoRepository::with_clock(Arc::new(test_clock()))
    }

    #[tokio::test]
    async fn create_with_content_only() {
        let repo = repo();
        let item = repo.create(NewTodo::new("Buy milk").unwrap()).await.unwrap();

        assert_eq!(item.id, TodoId::new(1));
        assert!(!item.completed);
        assert_eq!(item.submit_date, None);
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.created_at, test_clock().now());
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let repo = repo();
        let first = repo.create(NewTodo::new("a").unwrap()).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let second = repo.create(NewTodo::new("b").unwrap()).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn update_changes_only_patched_fields() {
        let repo = repo();
        let item = repo.create(NewTodo::new("Buy milk").unwrap()).await.unwrap();

        let updated = repo
            .update(item.id, TodoPatch::completed(true))
            .await
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.content, item.content);
        assert_eq!(updated.created_at, item.created_at);
        assert_eq!(updated.priority, item.priority);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let repo = repo();
        repo.create(NewTodo::new("a").unwrap()).await.unwrap();

        let result = repo.update(TodoId::new(42), TodoPatch::completed(true)).await;
        assert_eq!(result, Err(TodoError::NotFound(TodoId::new(42))));
        assert!(!repo.list().await.unwrap()[0].completed);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_row() {
        let repo = repo();
        let a = repo.create(NewTodo::new("a").unwrap()).await.unwrap();
        let b = repo.create(NewTodo::new("b").unwrap()).await.unwrap();

        assert!(repo.delete(a.id).await.unwrap());
        assert_eq!(repo.list().await.unwrap(), vec![b]);
    }

    #[tokio::test]
    async fn delete_missing_id_is_a_no_op() {
        let repo = repo();
        repo.create(NewTodo::new("a").unwrap()).await.unwrap();

        assert!(!repo.delete(TodoId::new(99)).await.unwrap());
        assert_eq!(repo.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let repo = repo();
        repo.set_unavailable(true);

        assert!(matches!(repo.list().await, Err(TodoError::Storage(_))));
        assert!(matches!(repo.ping().await, Err(TodoError::Storage(_))));

        repo.set_unavailable(false);
        assert!(repo.ping().await.is_ok());
    }
}
