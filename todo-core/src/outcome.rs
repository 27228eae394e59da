//! Aggregate result of one batch sync.

use std::fmt;
use todo_types::TodoId;

/// One id that could not be synced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    /// The id that failed.
    pub id: TodoId,
    /// Why it failed.
    pub message: String,
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "todo {}: {}", self.id, self.message)
    }
}

/// Summary of a sync run. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "SyncOutcome may contain failures that should be reported"]
pub struct SyncOutcome {
    /// Ids that were started (fetched, and persisted if the fetch succeeded).
    pub attempted: usize,
    /// Ids fetched and persisted successfully.
    pub succeeded: usize,
    /// Ids that failed, in completion order.
    pub failures: Vec<SyncFailure>,
    /// Ids never started because the run was cancelled.
    pub skipped: usize,
}

impl SyncOutcome {
    /// Record a successful item.
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    /// Record a failed item.
    pub fn record_failure(&mut self, id: TodoId, message: impl Into<String>) {
        self.attempted += 1;
        self.failures.push(SyncFailure {
            id,
            message: message.into(),
        });
    }

    /// Number of failed items.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every requested id was synced.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_success() {
        let outcome = SyncOutcome::default();
        assert_eq!(outcome.attempted, 0);
        assert_eq!(outcome.failed(), 0);
        assert!(outcome.is_success());
    }

    #[test]
    fn counts_successes_and_failures() {
        let mut outcome = SyncOutcome::default();
        outcome.record_success();
        outcome.record_failure(TodoId::try_from(4).unwrap(), "HTTP 404");
        outcome.record_success();

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed(), 1);
        assert!(!outcome.is_success());
        assert_eq!(outcome.failures[0].to_string(), "todo 4: HTTP 404");
    }

    #[test]
    fn skipped_items_are_not_success() {
        let outcome = SyncOutcome {
            skipped: 2,
            ..Default::default()
        };
        assert!(!outcome.is_success());
    }
}
