//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as generator timeouts and retry policies.

use std::time::Duration;

/// Application behavior configuration.
///
/// Controls how long a reply may take and how transient generator failures
/// are retried before the failure reaches the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorConfig {
    /// Maximum time to wait for one generator call before timing out.
    pub timeout: Option<Duration>,
    /// Automatic retries for transient failures.
    pub max_retries: u32,
    /// Delay before the first automatic retry; doubled for each later one.
    pub retry_backoff: Duration,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            timeout: Some(Duration::from_secs(seconds)),
            ..Self::default()
        }
    }

    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Delay before automatic retry number `attempt` (zero-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}
