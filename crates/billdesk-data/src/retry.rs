//! Retry policy for catalog fetches.
//!
//! The catalog is fetched once at startup, so the default is a single
//! attempt. Configured retries cover transient failures only: 5xx answers,
//! timeouts and refused connections.

use std::time::Duration;

use crate::client::FetchError;

/// Upper bound on the wait between two attempts.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(2);

/// How often and how patiently a failed fetch is repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub max_retries: u32,
    /// Wait before the first retry; doubled for each later one.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            delay: Duration::from_millis(200),
        }
    }

    /// A single attempt.
    pub fn none() -> Self {
        Self::new(0)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Whether `error` on attempt `attempt` (0-indexed) is worth another try.
    pub fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        match error {
            FetchError::Http { status, .. } => (500..600).contains(status),
            FetchError::Timeout(_) | FetchError::Connection(_) => true,
            _ => false,
        }
    }

    /// Wait before retry number `attempt + 1`, capped at [`MAX_RETRY_DELAY`].
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeout::TimeoutError;

    fn http(status: u16) -> FetchError {
        FetchError::Http {
            status,
            url: "http://localhost/api/bill/items".to_string(),
        }
    }

    #[test]
    fn test_default_is_single_attempt() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(&http(503), 0));
        assert!(!policy.should_retry(&FetchError::Connection("refused".into()), 0));
    }

    #[test]
    fn test_only_transient_failures_retry() {
        let policy = RetryPolicy::new(2);
        assert!(policy.should_retry(&http(502), 0));
        assert!(policy.should_retry(&FetchError::Timeout(TimeoutError::new(Duration::from_secs(1))), 1));
        assert!(!policy.should_retry(&http(502), 2));
        assert!(!policy.should_retry(&http(404), 0));
        assert!(!policy.should_retry(&FetchError::Deserialization("bad".into()), 0));
    }

    #[test]
    fn test_delay_doubles_up_to_cap() {
        let policy = RetryPolicy::new(5).with_delay(Duration::from_millis(300));
        assert_eq!(policy.delay_before(0), Duration::from_millis(300));
        assert_eq!(policy.delay_before(1), Duration::from_millis(600));
        assert_eq!(policy.delay_before(3), MAX_RETRY_DELAY);
        assert_eq!(policy.delay_before(40), MAX_RETRY_DELAY);
    }
}
