//! Mock fetcher for testing.
//!
//! Serves canned todos, injects failures and delays, and records calls.

use super::Fetcher;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use todo_types::{Todo, TodoError, TodoId};

/// Mock fetcher for testing.
///
/// Ids without a canned todo or failure answer like a 404.
#[derive(Debug, Default, Clone)]
pub struct MockFetcher {
    inner: Arc<Mutex<MockFetcherInner>>,
}

#[derive(Debug, Default)]
struct MockFetcherInner {
    todos: HashMap<TodoId, Todo>,
    failures: HashMap<TodoId, String>,
    delays: HashMap<TodoId, Duration>,
    default_delay: Duration,
    calls: Vec<TodoId>,
    in_flight: usize,
    peak_in_flight: usize,
}

impl MockFetcher {
    /// Create an empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `todo` for its id.
    pub fn insert(&self, todo: Todo) {
        let mut inner = self.inner.lock().unwrap();
        inner.todos.insert(todo.id, todo);
    }

    /// Fail every fetch of `id` with `message`.
    pub fn fail(&self, id: TodoId, message: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.failures.insert(id, message.to_string());
    }

    /// Hold every fetch of `id` for `delay` before answering.
    pub fn delay(&self, id: TodoId, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.delays.insert(id, delay);
    }

    /// Hold every fetch without its own delay for `delay`.
    pub fn set_default_delay(&self, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.default_delay = delay;
    }

    /// Ids fetched so far, in call order.
    pub fn calls(&self) -> Vec<TodoId> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }

    /// Number of fetches so far.
    pub fn call_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.calls.len()
    }

    /// Highest number of fetches that were in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.peak_in_flight
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_by_id(&self, id: TodoId) -> Result<Todo, TodoError> {
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(id);
            inner.in_flight += 1;
            inner.peak_in_flight = inner.peak_in_flight.max(inner.in_flight);
            inner.delays.get(&id).copied().unwrap_or(inner.default_delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        let mut inner = self.inner.lock().unwrap();
        inner.in_flight -= 1;
        if let Some(message) = inner.failures.get(&id) {
            return Err(TodoError::Fetch {
                id,
                message: message.clone(),
            });
        }
        inner.todos.get(&id).cloned().ok_or_else(|| TodoError::Fetch {
            id,
            message: "HTTP 404 Not Found".to_string(),
        })
    }
}
