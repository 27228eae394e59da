//! Progress reporting for batch sync.
//!
//! Two modes:
//! - [`TerminalReporter`]: one `indicatif` bar, redrawn in place
//! - [`LoggingReporter`]: one `tracing` event per update (CI, pipes)

use indicatif::{ProgressBar, ProgressStyle};
use todo_core::render;

/// `tracing` target of the [`LoggingReporter`] events.
///
/// The CLI enables it at `info` so progress shows under the default filter.
pub const PROGRESS_TARGET: &str = "todo::progress";

/// Receives `(completed, total)` updates from the orchestrator.
///
/// Calls arrive from a single task in increasing `completed` order.
pub trait ProgressReporter: Send {
    /// Show the initial `0/total` state.
    fn initialize(&mut self, total: usize);

    /// Show the current state. `completed == total` ends the display.
    fn update(&mut self, completed: usize, total: usize);

    /// End the display early (cancelled runs). No-op once complete.
    fn finish(&mut self) {}
}

/// Draws the progress line with an `indicatif` bar.
///
/// The bar's message is the rendered line, so the text matches
/// [`render`] exactly. Log output must go through the bar's `suspend`
/// (or that of the `MultiProgress` owning it) to stay off the bar's line.
pub struct TerminalReporter {
    bar: ProgressBar,
}

impl TerminalReporter {
    /// Drive an existing bar, e.g. one added to a `MultiProgress`.
    pub fn new(bar: ProgressBar) -> Self {
        match ProgressStyle::with_template("{msg}") {
            Ok(style) => bar.set_style(style),
            Err(e) => tracing::debug!("Invalid progress template: {}", e),
        }
        Self { bar }
    }

    /// The underlying bar.
    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    fn draw(&self, completed: usize, total: usize) {
        self.bar.set_position(completed as u64);
        self.bar.set_message(render(completed, total));
        if completed >= total {
            self.bar.finish();
        }
    }
}

impl ProgressReporter for TerminalReporter {
    fn initialize(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        self.draw(0, total);
    }

    fn update(&mut self, completed: usize, total: usize) {
        self.draw(completed, total);
    }

    fn finish(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}

/// Logging reporter using tracing for structured output.
#[derive(Debug, Default)]
pub struct LoggingReporter;

impl LoggingReporter {
    /// Create a logging reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for LoggingReporter {
    fn initialize(&mut self, total: usize) {
        tracing::info!(target: PROGRESS_TARGET, total, "Sync started");
    }

    fn update(&mut self, completed: usize, total: usize) {
        tracing::info!(
            target: PROGRESS_TARGET,
            completed,
            total,
            "{}",
            render(completed, total)
        );
    }
}
