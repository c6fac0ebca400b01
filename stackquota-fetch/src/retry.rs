//! Backoff policy for OpenStack API requests.
//!
//! Only failures that say nothing about the request itself are retried:
//! connection errors, client-side timeouts, `429 Too Many Requests` and
//! `503 Service Unavailable`. Everything else is returned on the first
//! attempt so the aggregator can decide what to do with it.

use reqwest::StatusCode;
use std::time::Duration;

/// Backoff policy applied by [`crate::HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryStrategy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl RetryStrategy {
    /// Creates a strategy with `max_attempts` total attempts.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }

    /// A single attempt, never retried.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Sets the delay before the first retry.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Returns true if another attempt is allowed after `attempt` failed.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay after failed attempt number `attempt` (1-based), doubling each
    /// time and capped at `max_delay_ms`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        let delay = self.base_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Delay honoring a server `Retry-After` hint, capped like any other delay.
    pub fn delay_with_hint(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        match retry_after_secs {
            Some(secs) => Duration::from_millis(secs.saturating_mul(1000).min(self.max_delay_ms)),
            None => self.delay_for_attempt(attempt),
        }
    }

    /// Returns true if a transport-level error is worth retrying.
    pub fn should_retry(&self, error: &reqwest::Error) -> bool {
        error.is_connect() || error.is_timeout()
    }

    /// Returns true if a response status is worth retrying.
    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let strategy = RetryStrategy::default();

        assert_eq!(strategy.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(strategy.delay_for_attempt(2), Duration::from_millis(1000));
        assert_eq!(strategy.delay_for_attempt(3), Duration::from_millis(2000));
    }

    #[test]
    fn test_backoff_is_capped() {
        let strategy = RetryStrategy::new(10).with_base_delay(Duration::from_secs(4));
        assert_eq!(strategy.delay_for_attempt(6), Duration::from_secs(10));
        assert_eq!(strategy.delay_with_hint(1, Some(120)), Duration::from_secs(10));
    }

    #[test]
    fn test_no_retry_allows_single_attempt() {
        let strategy = RetryStrategy::no_retry();
        assert!(!strategy.has_attempts_left(1));
        assert!(RetryStrategy::new(0).has_attempts_left(0));
    }

    #[test]
    fn test_retryable_statuses() {
        let strategy = RetryStrategy::default();
        assert!(strategy.should_retry_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(strategy.should_retry_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!strategy.should_retry_status(StatusCode::NOT_FOUND));
        assert!(!strategy.should_retry_status(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
