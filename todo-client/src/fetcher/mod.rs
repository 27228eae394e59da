//! Remote todo retrieval.
//!
//! # Design
//!
//! The fetcher trait is async and stateless from the caller's view:
//! - `fetch_by_id()` returns a validated [`Todo`] or `TodoError::Fetch`
//! - retries are the implementation's business, callers see one result
//!
//! [`HttpFetcher`] talks to the real API; [`MockFetcher`] serves canned
//! answers and records calls for tests.

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::MockFetcher;

use async_trait::async_trait;
use todo_types::{Todo, TodoError, TodoId};

/// Retrieves single todos from a remote source.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch and validate the todo with the given id.
    ///
    /// Every failure, after any retries, is a `TodoError::Fetch` for `id`.
    async fn fetch_by_id(&self, id: TodoId) -> Result<Todo, TodoError>;
}
