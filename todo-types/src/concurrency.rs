//! Concurrency policy for batch sync.

use crate::error::ValidationError;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Token accepted for an unlimited worker pool.
const UNBOUNDED_TOKEN: &str = "unbounded";

/// How many sync items may be in flight at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConcurrencyPolicy {
    /// One item at a time.
    #[default]
    Sequential,
    /// At most `n` items at a time (`n > 1`).
    Bounded(NonZeroUsize),
    /// Every item at once.
    Unbounded,
}

impl ConcurrencyPolicy {
    /// Effective worker count for a batch of `item_count` items.
    ///
    /// Never exceeds `item_count` and never drops below 1.
    pub fn degree(&self, item_count: usize) -> usize {
        let degree = match self {
            Self::Sequential => 1,
            Self::Bounded(n) => n.get(),
            Self::Unbounded => item_count,
        };
        degree.min(item_count).max(1)
    }
}

impl FromStr for ConcurrencyPolicy {
    type Err = ValidationError;

    /// Parse `"unbounded"` or a positive decimal integer.
    ///
    /// Only ASCII digits are accepted: no sign, no whitespace, no fraction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == UNBOUNDED_TOKEN {
            return Ok(Self::Unbounded);
        }
        let invalid = || ValidationError::InvalidConcurrency(s.to_string());
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let n: usize = s.parse().map_err(|_| invalid())?;
        match NonZeroUsize::new(n) {
            None => Err(invalid()),
            Some(n) if n.get() == 1 => Ok(Self::Sequential),
            Some(n) => Ok(Self::Bounded(n)),
        }
    }
}

impl fmt::Display for ConcurrencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "1"),
            Self::Bounded(n) => write!(f, "{}", n),
            Self::Unbounded => write!(f, "{}", UNBOUNDED_TOKEN),
        }
    }
}
