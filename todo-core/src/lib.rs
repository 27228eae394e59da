//! # todo-core
//!
//! Pure logic for todo-sync (no I/O, instant tests).
//!
//! - [`progress`]: fixed-width progress bar rendering
//! - [`backoff`]: exponential retry schedule for remote fetches
//! - [`outcome`]: aggregate result of one batch sync
//!
//! The I/O (network, database, terminal) lives in `todo-store` and
//! `todo-client`, which call into these functions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backoff;
pub mod outcome;
pub mod progress;

pub use backoff::RetryPolicy;
pub use outcome::{SyncFailure, SyncOutcome};
pub use progress::{render, BAR_WIDTH};
