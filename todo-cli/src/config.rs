//! Configuration loading for the todo CLI.
//!
//! Configuration is loaded from a TOML file (default: `todo.toml` in the
//! data directory). Every section and field is optional.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use todo_core::RetryPolicy;
use todo_types::{ConcurrencyPolicy, ValidationError};

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "todo.toml";

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "todos.db";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Local database.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Remote todo API.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Retry schedule for remote fetches.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Batch sync defaults.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Local database configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file (default: `todos.db` in the data directory).
    pub path: Option<PathBuf>,
}

/// Remote API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Base URL; todos are fetched from `<base_url>/todos/<id>`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Retry schedule configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds (default: 100).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Growth factor between retries (default: 2).
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
    /// Ceiling on a single delay in milliseconds (default: 5000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Total attempts per todo; 0 retries transient failures forever (default: 10).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Batch sync configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Concurrency token used when `--concurrency` is absent (default: "1").
    #[serde(default = "default_concurrency")]
    pub concurrency: String,
}

fn default_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_multiplier() -> u32 {
    2
}

fn default_max_delay_ms() -> u64 {
    5000
}

fn default_max_attempts() -> u32 {
    10
}

fn default_concurrency() -> String {
    "1".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            multiplier: default_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Per-request timeout for the remote API.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }

    /// Retry policy for remote fetches.
    pub fn retry_policy(&self) -> RetryPolicy {
        let max_attempts = match self.retry.max_attempts {
            0 => None,
            n => Some(n),
        };
        RetryPolicy {
            multiplier: self.retry.multiplier,
            ..RetryPolicy::default()
        }
        .with_delays(
            Duration::from_millis(self.retry.initial_delay_ms),
            Duration::from_millis(self.retry.max_delay_ms),
        )
        .with_max_attempts(max_attempts)
    }

    /// Concurrency policy for `token`, or the configured default.
    pub fn concurrency(&self, token: Option<&str>) -> Result<ConcurrencyPolicy, ValidationError> {
        token.unwrap_or(&self.sync.concurrency).parse()
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
