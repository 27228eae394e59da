//! Log subscriber setup.
//!
//! Logs go to stderr, where the progress bar also lives. Every log line is
//! written inside `MultiProgress::suspend`, which clears the bar, writes the
//! line and redraws the bar below it.

use console::Term;
use indicatif::MultiProgress;
use std::io::{self, Write};
use todo_client::PROGRESS_TARGET;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Install the log subscriber on stderr.
///
/// Default level is `warn` (`-v` info, `-vv` debug); `RUST_LOG` overrides.
/// Progress events are always enabled at `info`.
pub fn init(verbose: u8, progress: &MultiProgress) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(Term::stderr().is_term())
        .with_writer(ProgressAwareWriter::stderr(progress.clone()))
        .init();
}

fn directives(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("{},{}=info", level, PROGRESS_TARGET)
}

/// Makes writers that suspend the progress bars around each write.
#[derive(Clone)]
pub struct ProgressAwareWriter<F> {
    progress: MultiProgress,
    make_inner: F,
}

impl ProgressAwareWriter<fn() -> io::Stderr> {
    /// Write to stderr.
    pub fn stderr(progress: MultiProgress) -> Self {
        Self {
            progress,
            make_inner: io::stderr,
        }
    }
}

impl<F, W> ProgressAwareWriter<F>
where
    F: Fn() -> W,
    W: Write,
{
    fn writer(&self) -> SuspendingWriter<W> {
        SuspendingWriter {
            progress: self.progress.clone(),
            inner: (self.make_inner)(),
        }
    }
}

impl<'a, F, W> MakeWriter<'a> for ProgressAwareWriter<F>
where
    F: Fn() -> W,
    W: Write,
{
    type Writer = SuspendingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer()
    }
}

/// One log write, performed with the progress bars hidden.
pub struct SuspendingWriter<W> {
    progress: MultiProgress,
    inner: W,
}

impl<W: Write> Write for SuspendingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.progress
            .suspend(|| inner.write_all(buf).and_then(|_| inner.flush()))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
