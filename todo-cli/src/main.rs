//! # todo
//!
//! Command-line todo manager with a local SQLite store and batch sync from
//! a remote todo API.
//!
//! ## Commands
//!
//! - `init`: Create the database and seed sample todos
//! - `get`: Show one todo
//! - `list`: Show every todo
//! - `create`: Add a todo
//! - `clear`: Delete every todo
//! - `sync`: Fetch todos by id from the remote API and store them
//!
//! ## Example
//!
//! ```bash
//! todo init
//! todo create 1 "Buy milk"
//! todo sync 1 2 3 4 5 --concurrency 4
//! todo list
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use console::Term;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::sync::Arc;
use todo_client::{CancelSignal, HttpFetcher, LoggingReporter, ProgressReporter, TerminalReporter};
use todo_store::SqliteStore;
use todo_types::TodoId;

mod commands;
mod config;
mod logging;

use commands::{clear, create, get, init, list, sync};
use config::{Config, CONFIG_FILE, DATABASE_FILE};

/// Command-line todo manager with remote sync.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: todo.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides the config file)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Base URL of the remote todo API (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database and seed sample todos
    Init,

    /// Show one todo
    Get {
        /// Todo id
        id: String,
    },

    /// Show every todo
    List,

    /// Add a todo
    Create {
        /// Owner of the todo
        user_id: String,

        /// What needs doing
        title: String,

        /// Whether it is already done
        #[arg(default_value_t = false, action = ArgAction::Set)]
        completed: bool,
    },

    /// Delete every todo
    Clear,

    /// Fetch todos by id from the remote API and store them
    Sync {
        /// Todo ids to fetch
        #[arg(required = true)]
        ids: Vec<String>,

        /// Parallel fetches: a positive integer or "unbounded" (default: "1")
        #[arg(long, short)]
        concurrency: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let progress = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
    logging::init(cli.verbose, &progress);

    match run(cli, progress).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, progress: MultiProgress) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    let database = match cli.database {
        Some(path) => path,
        None => match &config.database.path {
            Some(path) => path.clone(),
            None => default_data_dir()?.join(DATABASE_FILE),
        },
    };
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Init => {
            let store = open_store(&database).await?;
            init::run(&store, &mut stdout).await?;
        }
        Commands::Get { id } => {
            let id: TodoId = id.parse()?;
            let store = open_store(&database).await?;
            get::run(&store, id, &mut stdout).await?;
        }
        Commands::List => {
            let store = open_store(&database).await?;
            list::run(&store, &mut stdout).await?;
        }
        Commands::Create {
            user_id,
            title,
            completed,
        } => {
            let new = create::parse(&user_id, &title, completed)?;
            let store = open_store(&database).await?;
            create::run(&store, new, &mut stdout).await?;
        }
        Commands::Clear => {
            let store = open_store(&database).await?;
            clear::run(&store, &mut stdout).await?;
        }
        Commands::Sync { ids, concurrency } => {
            let policy = config.concurrency(concurrency.as_deref())?;
            let request = sync::SyncRequest::parse(&ids, policy)?;

            let base_url = cli.api_url.as_deref().unwrap_or(&config.remote.base_url);
            let fetcher = HttpFetcher::new(base_url, config.timeout(), config.retry_policy())
                .context("Failed to build HTTP client")?;
            let store = open_store(&database).await?;

            let cancel = CancelSignal::new();
            spawn_interrupt_handler(cancel.clone());

            let mut reporter: Box<dyn ProgressReporter> = if Term::stderr().is_term() {
                Box::new(TerminalReporter::new(progress.add(ProgressBar::new(0))))
            } else {
                Box::new(LoggingReporter::new())
            };

            let outcome = sync::run(
                Arc::new(fetcher),
                Arc::new(store),
                &request,
                reporter.as_mut(),
                &cancel,
                &mut stdout,
            )
            .await?;
            if !outcome.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load an explicit config file, or the default one if it exists.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Ok(Config::from_file(path)?);
    }
    match default_data_dir() {
        Ok(dir) => Ok(Config::from_file_or_default(&dir.join(CONFIG_FILE))?),
        Err(e) => {
            tracing::debug!("No data directory ({:#}), using default config", e);
            Ok(Config::default())
        }
    }
}

/// Open the database, creating its directory if needed.
async fn open_store(path: &Path) -> Result<SqliteStore> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    SqliteStore::open(path)
        .await
        .with_context(|| format!("Failed to open database {}", path.display()))
}

/// Cancel `signal` on the first Ctrl+C; items already in flight finish.
fn spawn_interrupt_handler(signal: CancelSignal) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupted, finishing todos already in flight");
                signal.cancel();
            }
            Err(e) => tracing::debug!("Ctrl+C handler unavailable: {}", e),
        }
    });
}

/// Get the default data directory for the todo CLI.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "todosync", "todo")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
