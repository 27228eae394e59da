//! Error types for todo-sync.

use crate::ids::TodoId;
use thiserror::Error;

/// Input rejected before any I/O takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title was empty.
    #[error("title must not be empty")]
    EmptyTitle,

    /// Title exceeded the maximum length.
    #[error("title is {len} characters long (maximum 255)")]
    TitleTooLong {
        /// Length of the rejected title, in characters.
        len: usize,
    },

    /// Todo id was not a positive integer.
    #[error("invalid todo id '{0}': must be a positive integer")]
    InvalidId(String),

    /// User id was not a positive integer.
    #[error("invalid user id '{0}': must be a positive integer")]
    InvalidUserId(String),

    /// Concurrency token was neither "unbounded" nor a positive integer.
    #[error("invalid concurrency '{0}': expected a positive integer or \"unbounded\"")]
    InvalidConcurrency(String),
}

/// Every failure a todo-sync operation can report.
///
/// Callers match exhaustively; `NotFound` is kept apart from `Store` so point
/// lookups can turn it into a user message instead of a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    /// Bad input (title, id, user id, concurrency token).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Point lookup found no record.
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// Persistence layer failure.
    #[error("store error: {0}")]
    Store(String),

    /// Remote retrieval failed.
    #[error("failed to fetch todo {id}: {message}")]
    Fetch {
        /// The id that could not be fetched.
        id: TodoId,
        /// What went wrong.
        message: String,
    },
}

impl TodoError {
    /// Whether this is the not-found case of a point lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
