//! HTTP fetcher with exponential backoff.

use super::Fetcher;
use async_trait::async_trait;
use std::time::Duration;
use todo_core::RetryPolicy;
use todo_types::{Todo, TodoError, TodoId};

/// Why a single attempt failed.
#[derive(Debug)]
enum AttemptError {
    /// Network trouble or a 5xx: worth another try.
    Transient(String),
    /// 4xx, bad payload, bad URL: retrying cannot help.
    Permanent(String),
}

/// Fetches todos from `GET {base_url}/todos/{id}`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Create a fetcher for the API at `base_url`.
    ///
    /// `timeout` bounds each individual request; `retry` governs the waits
    /// between attempts.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("todo-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// The retry policy in use.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    fn url_for(&self, id: TodoId) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    async fn attempt(&self, id: TodoId) -> Result<Todo, AttemptError> {
        let response = self.client.get(self.url_for(id)).send().await.map_err(|e| {
            if e.is_builder() {
                AttemptError::Permanent(format!("invalid request: {}", e))
            } else {
                AttemptError::Transient(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(AttemptError::Transient(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(AttemptError::Permanent(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transient(format!("failed to read body: {}", e)))?;
        let todo: Todo = serde_json::from_str(&body)
            .map_err(|e| AttemptError::Permanent(format!("invalid payload: {}", e)))?;

        if todo.id != id {
            return Err(AttemptError::Permanent(format!(
                "response carried id {} instead of {}",
                todo.id, id
            )));
        }

        Ok(todo)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_by_id(&self, id: TodoId) -> Result<Todo, TodoError> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match self.attempt(id).await {
                Ok(todo) => {
                    tracing::debug!(id = %id, attempts, "Fetched todo");
                    return Ok(todo);
                }
                Err(AttemptError::Permanent(message)) => {
                    return Err(TodoError::Fetch { id, message });
                }
                Err(AttemptError::Transient(message)) => {
                    if !self.retry.allows_another(attempts) {
                        return Err(TodoError::Fetch {
                            id,
                            message: format!("{} (gave up after {} attempts)", message, attempts),
                        });
                    }
                    let delay = self.retry.delay_for(attempts - 1);
                    tracing::warn!(
                        id = %id,
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %message,
                        "Transient fetch failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
