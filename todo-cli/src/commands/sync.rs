//! Fetch todos from the remote API and store them locally.

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use todo_client::{CancelSignal, Fetcher, ProgressReporter, SyncOrchestrator};
use todo_core::SyncOutcome;
use todo_store::TodoStore;
use todo_types::{ConcurrencyPolicy, TodoId, ValidationError};

/// Validated sync arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// Ids to sync, in submission order.
    pub ids: Vec<TodoId>,
    /// How many ids may be in flight at once.
    pub policy: ConcurrencyPolicy,
}

impl SyncRequest {
    /// Validate the concurrency token and ids. Nothing here does I/O.
    pub fn parse(raw_ids: &[String], policy: ConcurrencyPolicy) -> Result<Self, ValidationError> {
        let ids = raw_ids
            .iter()
            .map(|raw| raw.parse())
            .collect::<Result<Vec<TodoId>, _>>()?;
        Ok(Self { ids, policy })
    }
}

/// Run the sync command and print its summary.
pub async fn run<F, S, W>(
    fetcher: Arc<F>,
    store: Arc<S>,
    request: &SyncRequest,
    reporter: &mut dyn ProgressReporter,
    cancel: &CancelSignal,
    out: &mut W,
) -> Result<SyncOutcome>
where
    F: Fetcher + 'static,
    S: TodoStore + 'static,
    W: Write,
{
    let orchestrator = SyncOrchestrator::new(fetcher, store);
    let outcome = orchestrator
        .run(&request.ids, request.policy, reporter, cancel)
        .await;

    writeln!(
        out,
        "Synced {}/{} todos",
        outcome.succeeded,
        request.ids.len()
    )?;
    for failure in &outcome.failures {
        writeln!(out, "  failed: {}", failure)?;
    }
    if outcome.skipped > 0 {
        writeln!(out, "  skipped: {} (interrupted)", outcome.skipped)?;
    }
    Ok(outcome)
}
