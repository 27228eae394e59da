//! # todo-store
//!
//! Record store for todo-sync.
//!
//! [`TodoStore`] is the contract the CLI and the sync orchestrator depend on;
//! [`SqliteStore`] is the SQLite implementation.
//!
//! ## Failure kinds
//!
//! - `TodoError::NotFound` for point lookups that miss
//! - `TodoError::Store` for everything else (connectivity, constraint
//!   violations, rows that fail validation on read)

#![warn(missing_docs)]
#![warn(clippy::all)]

mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use todo_types::{NewTodo, Todo, TodoError, TodoId};

/// A todo as persisted, with its creation and modification markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTodo {
    /// The record itself.
    pub todo: Todo,
    /// Unix timestamp when the row was first written.
    pub created_at: i64,
    /// Unix timestamp of the last write.
    pub updated_at: i64,
}

/// Trait for todo storage backends.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Ensure the schema exists and seed sample rows into an empty table.
    ///
    /// Safe to call repeatedly. Returns the number of rows seeded.
    async fn initialize(&self) -> Result<usize, TodoError>;

    /// Get one todo by id.
    async fn get_by_id(&self, id: TodoId) -> Result<StoredTodo, TodoError>;

    /// All todos, ordered by ascending id.
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError>;

    /// Insert a new todo with a store-assigned id.
    async fn create(&self, new: NewTodo) -> Result<Todo, TodoError>;

    /// Delete every todo. Returns the number of rows deleted.
    async fn clear(&self) -> Result<u64, TodoError>;

    /// Insert `todo` under its own id, or replace the existing row's fields.
    ///
    /// The original creation marker survives a replace.
    async fn upsert(&self, todo: &Todo) -> Result<Todo, TodoError>;
}
