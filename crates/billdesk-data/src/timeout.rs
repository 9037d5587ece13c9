//! Timeout configuration for catalog fetches.

use std::time::Duration;

/// Timeout configuration for a fetch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection timeout.
    pub connect: Duration,
    /// Total time allowed for one attempt, body included.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: Duration::from_millis(total.as_millis() as u64 / 4),
            total,
        }
    }

    /// Create from a total in milliseconds, as read from config.
    pub fn from_millis(total_ms: u64) -> Self {
        Self::from_total(Duration::from_millis(total_ms))
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(Duration::from_secs(5))
    }
}

/// A fetch did not finish within its total bound.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no answer after {after:?}")]
pub struct TimeoutError {
    pub after: Duration,
}

impl TimeoutError {
    pub fn new(after: Duration) -> Self {
        Self { after }
    }
}
