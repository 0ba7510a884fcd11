//! # Todo
//!
//! Domain of the todo list: item types, input validation, the
//! [`TodoRepository`] seam, an in-memory repository, and the client state
//! controller that keeps a local copy of the list in sync with the API.
//!
//! ## Example
//!
//! ```
//! use todo::{InMemoryTodoRepository, NewTodo, Priority, TodoPatch, TodoRepository};
//!
//! # tokio_test::block_on(async {
//! let repo = InMemoryTodoRepository::new();
//! let todo = repo
//!     .create(NewTodo::new("Buy milk")?.with_priority(Priority::Low))
//!     .await?;
//!
//! let done = repo.update(todo.id, TodoPatch::completed(true)).await?;
//! assert!(done.completed);
//! # Ok::<(), todo::TodoError>(())
//! # }).unwrap();
//! ```

pub mod client;
pub mod error;
pub mod memory;
pub mod repository;
pub mod request;
pub mod types;
pub mod validation;

pub use error::{Result, TodoError};
pub use memory::InMemoryTodoRepository;
pub use repository::TodoRepository;
pub use request::{CreateTodoRequest, DeleteResponse, DeleteTodoRequest, UpdateTodoRequest};
pub use types::{NewTodo, Priority, TodoId, TodoItem, TodoPatch};
