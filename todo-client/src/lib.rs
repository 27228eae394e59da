//! # todo-client
//!
//! Remote retrieval and batch synchronization for todo-sync.
//!
//! ## Components
//!
//! - [`Fetcher`]: retrieves one todo by id ([`HttpFetcher`] over HTTP with
//!   exponential backoff, [`MockFetcher`] for tests)
//! - [`ProgressReporter`]: shows `(completed, total)` as a bar
//!   ([`TerminalReporter`], backed by `indicatif`) or as log lines
//!   ([`LoggingReporter`])
//! - [`SyncOrchestrator`]: fetches and persists a list of ids under a
//!   [`ConcurrencyPolicy`](todo_types::ConcurrencyPolicy)
//!
//! ## Example
//!
//! ```ignore
//! use indicatif::ProgressBar;
//! use std::sync::Arc;
//! use todo_client::{CancelSignal, HttpFetcher, SyncOrchestrator, TerminalReporter};
//!
//! let fetcher = HttpFetcher::new("https://jsonplaceholder.typicode.com", timeout, retry)?;
//! let store = SqliteStore::open(&path).await?;
//! let orchestrator = SyncOrchestrator::new(Arc::new(fetcher), Arc::new(store));
//!
//! let mut reporter = TerminalReporter::new(ProgressBar::new(0));
//! let outcome = orchestrator
//!     .run(&ids, "4".parse()?, &mut reporter, &CancelSignal::new())
//!     .await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fetcher;
pub mod orchestrator;
pub mod reporter;

pub use fetcher::{Fetcher, HttpFetcher, MockFetcher};
pub use orchestrator::{CancelSignal, SyncOrchestrator};
pub use reporter::{LoggingReporter, ProgressReporter, TerminalReporter, PROGRESS_TARGET};
