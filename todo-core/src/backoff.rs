//! Retry schedule for remote fetches.
//!
//! Formula: delay before retry `k` (0-based) = min(max_delay, initial * multiplier^k)

use std::time::Duration;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(100);

/// Default growth factor between retries.
pub const DEFAULT_MULTIPLIER: u32 = 2;

/// Default ceiling on any single wait.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);

/// Default total attempts (first try plus retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Exponential backoff policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: u32,
    /// Ceiling on any single delay.
    pub max_delay: Duration,
    /// Total attempts allowed. `None` retries transient failures forever.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            max_delay: DEFAULT_MAX_DELAY,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait before retry number `retry` (0 = first retry).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1).saturating_pow(retry);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Whether another attempt is allowed after `attempts_made` attempts.
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts_made < max,
            None => true,
        }
    }

    /// Set the attempt limit.
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the first and maximum delays.
    pub fn with_delays(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_delay = initial;
        self.max_delay = max;
        self
    }
}
