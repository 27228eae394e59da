//! Batch synchronization of todos from a remote source into the store.
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────── work queue (ids) ────────────┐
//!              ▼                    ▼                     ▼
//!          worker 1             worker 2      ...     worker d
//!       fetch → upsert       fetch → upsert        fetch → upsert
//!              │                    │                     │
//!              └──────── completion channel ─────────────┘
//!                                   ▼
//!                     consumer (caller's task): counter,
//!                     outcome, progress reporter
//! ```
//!
//! At most `d` ids are in flight at once. Only the consumer touches the
//! completed counter and the reporter, so each completion is counted and
//! rendered exactly once regardless of the order workers finish in.
//!
//! A failed fetch or upsert is recorded against its id; the other workers
//! carry on.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use todo_core::SyncOutcome;
use todo_store::TodoStore;
use todo_types::{ConcurrencyPolicy, TodoError, TodoId};

use crate::fetcher::Fetcher;
use crate::reporter::ProgressReporter;

/// Cooperative cancellation for a sync run.
///
/// Once cancelled, workers take no new ids; items already started finish.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    /// Create a signal that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Result of one id, sent from a worker to the consumer.
struct Completion {
    id: TodoId,
    result: Result<(), TodoError>,
}

type WorkQueue = Arc<Mutex<VecDeque<TodoId>>>;

/// Drives fetch + persist for a batch of ids.
pub struct SyncOrchestrator<F, S> {
    fetcher: Arc<F>,
    store: Arc<S>,
}

impl<F, S> SyncOrchestrator<F, S>
where
    F: Fetcher + 'static,
    S: TodoStore + 'static,
{
    /// Create an orchestrator over the given fetcher and store.
    pub fn new(fetcher: Arc<F>, store: Arc<S>) -> Self {
        Self { fetcher, store }
    }

    /// Sync every id in `ids` (duplicates included) under `policy`.
    ///
    /// An empty list returns an empty outcome without touching the fetcher,
    /// the store or the reporter.
    pub async fn run<R>(
        &self,
        ids: &[TodoId],
        policy: ConcurrencyPolicy,
        reporter: &mut R,
        cancel: &CancelSignal,
    ) -> SyncOutcome
    where
        R: ProgressReporter + ?Sized,
    {
        let total = ids.len();
        if total == 0 {
            tracing::debug!("No ids to sync");
            return SyncOutcome::default();
        }

        let degree = policy.degree(total);
        tracing::info!(total, degree, policy = %policy, "Starting sync");
        reporter.initialize(total);

        let queue: WorkQueue = Arc::new(Mutex::new(ids.iter().copied().collect()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut workers = Vec::with_capacity(degree);
        for worker in 0..degree {
            workers.push(tokio::spawn(run_worker(
                worker,
                Arc::clone(&self.fetcher),
                Arc::clone(&self.store),
                Arc::clone(&queue),
                tx.clone(),
                cancel.clone(),
            )));
        }
        // Workers hold the remaining senders; the channel closes when the last one exits.
        drop(tx);

        let mut outcome = SyncOutcome::default();
        let mut completed = 0;
        while let Some(Completion { id, result }) = rx.recv().await {
            completed += 1;
            match result {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Failed to sync todo");
                    outcome.record_failure(id, failure_message(e));
                }
            }
            reporter.update(completed, total);
        }

        for handle in workers {
            if let Err(e) = handle.await {
                tracing::error!("Sync worker panicked: {}", e);
            }
        }

        // Ids never reported: left queued on cancel, or lost to a panicked worker.
        outcome.skipped = total - outcome.attempted;
        if completed < total {
            reporter.finish();
        }

        tracing::info!(
            attempted = outcome.attempted,
            succeeded = outcome.succeeded,
            failed = outcome.failed(),
            skipped = outcome.skipped,
            "Sync finished"
        );
        outcome
    }
}

/// Pull ids from the queue until it is empty or the run is cancelled.
async fn run_worker<F, S>(
    worker: usize,
    fetcher: Arc<F>,
    store: Arc<S>,
    queue: WorkQueue,
    tx: mpsc::UnboundedSender<Completion>,
    cancel: CancelSignal,
) where
    F: Fetcher,
    S: TodoStore,
{
    loop {
        if cancel.is_cancelled() {
            tracing::debug!(worker, "Cancelled, taking no more ids");
            break;
        }
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some(id) = next else {
            break;
        };

        tracing::debug!(worker, id = %id, "Syncing todo");
        let result = sync_one(fetcher.as_ref(), store.as_ref(), id).await;
        if tx.send(Completion { id, result }).is_err() {
            // Consumer is gone; nobody will count further work.
            break;
        }
    }
}

async fn sync_one<F, S>(fetcher: &F, store: &S, id: TodoId) -> Result<(), TodoError>
where
    F: Fetcher + ?Sized,
    S: TodoStore + ?Sized,
{
    let todo = fetcher.fetch_by_id(id).await?;
    store.upsert(&todo).await?;
    Ok(())
}

/// Failure text without repeating the id the failure is filed under.
fn failure_message(error: TodoError) -> String {
    match error {
        TodoError::Fetch { message, .. } => message,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::MockFetcher;
    use async_trait::async_trait;
    use std::num::NonZeroUsize;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use todo_store::{SqliteStore, StoredTodo};
    use todo_types::{NewTodo, Title, Todo, UserId};

    /// Store wrapper that counts upserts and can fail them for one id.
    struct CountingStore {
        inner: SqliteStore,
        upserts: AtomicUsize,
        fail_upsert_for: Option<TodoId>,
    }

    impl CountingStore {
        async fn new(fail_upsert_for: Option<TodoId>) -> Self {
            Self {
                inner: SqliteStore::in_memory().await.unwrap(),
                upserts: AtomicUsize::new(0),
                fail_upsert_for,
            }
        }

        fn upserts(&self) -> usize {
            self.upserts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TodoStore for CountingStore {
        async fn initialize(&self) -> Result<usize, TodoError> {
            self.inner.initialize().await
        }

        async fn get_by_id(&self, id: TodoId) -> Result<StoredTodo, TodoError> {
            self.inner.get_by_id(id).await
        }

        async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
            self.inner.list_all().await
        }

        async fn create(&self, new: NewTodo) -> Result<Todo, TodoError> {
            self.inner.create(new).await
        }

        async fn clear(&self) -> Result<u64, TodoError> {
            self.inner.clear().await
        }

        async fn upsert(&self, todo: &Todo) -> Result<Todo, TodoError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            if self.fail_upsert_for == Some(todo.id) {
                return Err(TodoError::Store("disk I/O error".into()));
            }
            self.inner.upsert(todo).await
        }
    }

    /// Records every reporter call; can cancel a signal on the first update.
    #[derive(Default)]
    struct RecordingReporter {
        initialized: Vec<usize>,
        updates: Vec<(usize, usize)>,
        finished: usize,
        cancel_on_first_update: Option<CancelSignal>,
    }

    impl ProgressReporter for RecordingReporter {
        fn initialize(&mut self, total: usize) {
            self.initialized.push(total);
        }

        fn update(&mut self, completed: usize, total: usize) {
            self.updates.push((completed, total));
            if let Some(cancel) = self.cancel_on_first_update.take() {
                cancel.cancel();
            }
        }

        fn finish(&mut self) {
            self.finished += 1;
        }
    }

    fn id(n: i64) -> TodoId {
        TodoId::try_from(n).unwrap()
    }

    fn ids(ns: &[i64]) -> Vec<TodoId> {
        ns.iter().map(|n| id(*n)).collect()
    }

    fn remote_todo(n: i64) -> Todo {
        Todo {
            user_id: UserId::try_from(1).unwrap(),
            id: id(n),
            title: Title::new(format!("remote {}", n)).unwrap(),
            completed: n % 2 == 0,
        }
    }

    fn fetcher_with(ns: impl IntoIterator<Item = i64>) -> MockFetcher {
        let fetcher = MockFetcher::new();
        for n in ns {
            fetcher.insert(remote_todo(n));
        }
        fetcher
    }

    fn bounded(n: usize) -> ConcurrencyPolicy {
        ConcurrencyPolicy::Bounded(NonZeroUsize::new(n).unwrap())
    }

    #[tokio::test]
    async fn sequential_sync_fetches_and_persists_each_id() {
        let fetcher = Arc::new(fetcher_with(1..=3));
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), Arc::clone(&store));
        let mut reporter = RecordingReporter::default();

        let outcome = orchestrator
            .run(
                &ids(&[1, 2, 3]),
                "1".parse().unwrap(),
                &mut reporter,
                &CancelSignal::new(),
            )
            .await;

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.succeeded, 3);
        assert_eq!(outcome.failed(), 0);
        assert!(outcome.is_success());
        assert_eq!(fetcher.call_count(), 3);
        assert_eq!(store.upserts(), 3);

        let stored = store.list_all().await.unwrap();
        assert_eq!(stored, vec![remote_todo(1), remote_todo(2), remote_todo(3)]);
    }

    #[tokio::test]
    async fn sequential_sync_keeps_submission_order() {
        let fetcher = Arc::new(fetcher_with([5, 3, 9]));
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), store);

        let _ = orchestrator
            .run(
                &ids(&[5, 3, 9]),
                ConcurrencyPolicy::Sequential,
                &mut RecordingReporter::default(),
                &CancelSignal::new(),
            )
            .await;

        assert_eq!(fetcher.calls(), ids(&[5, 3, 9]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn unbounded_sync_isolates_fetch_failure() {
        let fetcher = Arc::new(fetcher_with(1..=2));
        fetcher.fail(id(1), "HTTP 500 Internal Server Error (gave up after 10 attempts)");
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), Arc::clone(&store));

        let outcome = orchestrator
            .run(
                &ids(&[1, 2]),
                "unbounded".parse().unwrap(),
                &mut RecordingReporter::default(),
                &CancelSignal::new(),
            )
            .await;

        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].id, id(1));
        assert!(outcome.failures[0].message.starts_with("HTTP 500"));
        assert_eq!(store.list_all().await.unwrap(), vec![remote_todo(2)]);
        assert_eq!(store.upserts(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn persist_failure_is_isolated() {
        let fetcher = Arc::new(fetcher_with(1..=4));
        let store = Arc::new(CountingStore::new(Some(id(3))).await);
        let orchestrator = SyncOrchestrator::new(fetcher, Arc::clone(&store));

        let outcome = orchestrator
            .run(
                &ids(&[1, 2, 3, 4]),
                bounded(2),
                &mut RecordingReporter::default(),
                &CancelSignal::new(),
            )
            .await;

        assert_eq!(outcome.succeeded, 3);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].id, id(3));
        assert_eq!(outcome.failures[0].message, "store error: disk I/O error");
        assert_eq!(store.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn progress_counts_every_completion_once() {
        let fetcher = Arc::new(fetcher_with(1..=5));
        fetcher.fail(id(4), "boom");
        fetcher.set_default_delay(Duration::from_millis(5));
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(fetcher, store);
        let mut reporter = RecordingReporter::default();

        let _ = orchestrator
            .run(
                &ids(&[1, 2, 3, 4, 5, 6]),
                ConcurrencyPolicy::Unbounded,
                &mut reporter,
                &CancelSignal::new(),
            )
            .await;

        assert_eq!(reporter.initialized, vec![6]);
        let expected: Vec<(usize, usize)> = (1..=6).map(|c| (c, 6)).collect();
        assert_eq!(reporter.updates, expected);
        assert_eq!(reporter.updates.iter().filter(|(c, t)| c == t).count(), 1);
        assert_eq!(reporter.finished, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn bounded_policy_caps_in_flight_fetches() {
        let fetcher = Arc::new(fetcher_with(1..=12));
        fetcher.set_default_delay(Duration::from_millis(20));
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), store);

        let all: Vec<i64> = (1..=12).collect();
        let outcome = orchestrator
            .run(
                &ids(&all),
                bounded(3),
                &mut RecordingReporter::default(),
                &CancelSignal::new(),
            )
            .await;

        assert_eq!(outcome.succeeded, 12);
        let peak = fetcher.peak_in_flight();
        assert!(peak <= 3, "peak in flight was {}", peak);
        assert!(peak > 1, "bounded(3) never overlapped fetches");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sequential_policy_never_overlaps() {
        let fetcher = Arc::new(fetcher_with(1..=4));
        fetcher.set_default_delay(Duration::from_millis(5));
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), store);

        let _ = orchestrator
            .run(
                &ids(&[1, 2, 3, 4]),
                ConcurrencyPolicy::Sequential,
                &mut RecordingReporter::default(),
                &CancelSignal::new(),
            )
            .await;

        assert_eq!(fetcher.peak_in_flight(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn unbounded_policy_runs_everything_at_once() {
        let fetcher = Arc::new(fetcher_with(1..=8));
        fetcher.set_default_delay(Duration::from_millis(50));
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), store);

        let all: Vec<i64> = (1..=8).collect();
        let outcome = orchestrator
            .run(
                &ids(&all),
                ConcurrencyPolicy::Unbounded,
                &mut RecordingReporter::default(),
                &CancelSignal::new(),
            )
            .await;

        assert_eq!(outcome.succeeded, 8);
        assert!(fetcher.peak_in_flight() > 3);
        assert!(fetcher.peak_in_flight() <= 8);
    }

    #[tokio::test]
    async fn empty_id_list_is_a_no_op() {
        let fetcher = Arc::new(MockFetcher::new());
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), Arc::clone(&store));
        let mut reporter = RecordingReporter::default();

        let outcome = orchestrator
            .run(&[], ConcurrencyPolicy::Unbounded, &mut reporter, &CancelSignal::new())
            .await;

        assert_eq!(outcome, SyncOutcome::default());
        assert_eq!(fetcher.call_count(), 0);
        assert_eq!(store.upserts(), 0);
        assert!(reporter.initialized.is_empty());
        assert!(reporter.updates.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn duplicate_ids_are_processed_independently() {
        let fetcher = Arc::new(fetcher_with([4]));
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), Arc::clone(&store));

        let outcome = orchestrator
            .run(
                &ids(&[4, 4]),
                ConcurrencyPolicy::Unbounded,
                &mut RecordingReporter::default(),
                &CancelSignal::new(),
            )
            .await;

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(fetcher.call_count(), 2);
        assert_eq!(store.upserts(), 2);
        assert_eq!(store.list_all().await.unwrap(), vec![remote_todo(4)]);
    }

    #[tokio::test]
    async fn cancelled_before_start_skips_everything() {
        let fetcher = Arc::new(fetcher_with(1..=3));
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), store);
        let mut reporter = RecordingReporter::default();
        let cancel = CancelSignal::new();
        cancel.cancel();

        let outcome = orchestrator
            .run(&ids(&[1, 2, 3]), bounded(2), &mut reporter, &cancel)
            .await;

        assert_eq!(outcome.attempted, 0);
        assert_eq!(outcome.skipped, 3);
        assert!(!outcome.is_success());
        assert_eq!(fetcher.call_count(), 0);
        assert_eq!(reporter.initialized, vec![3]);
        assert_eq!(reporter.finished, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn cancel_mid_run_lets_started_items_finish() {
        let fetcher = Arc::new(fetcher_with(1..=5));
        fetcher.set_default_delay(Duration::from_millis(20));
        let store = Arc::new(CountingStore::new(None).await);
        let orchestrator = SyncOrchestrator::new(Arc::clone(&fetcher), Arc::clone(&store));
        let cancel = CancelSignal::new();
        let mut reporter = RecordingReporter {
            cancel_on_first_update: Some(cancel.clone()),
            ..Default::default()
        };

        let outcome = orchestrator
            .run(
                &ids(&[1, 2, 3, 4, 5]),
                ConcurrencyPolicy::Sequential,
                &mut reporter,
                &cancel,
            )
            .await;

        assert!(outcome.attempted >= 1 && outcome.attempted < 5);
        assert_eq!(outcome.attempted + outcome.skipped, 5);
        assert_eq!(outcome.succeeded, outcome.attempted);
        assert_eq!(store.upserts(), outcome.attempted);
        assert_eq!(reporter.finished, 1);
    }

    #[test]
    fn cancel_signal_is_shared_between_clones() {
        let signal = CancelSignal::new();
        let clone = signal.clone();
        assert!(!clone.is_cancelled());
        signal.cancel();
        assert!(clone.is_cancelled());
    }
}
