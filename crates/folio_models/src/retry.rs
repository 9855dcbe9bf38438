//! Retry policy for transient generation failures.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};

/// Jittered exponential backoff settings.
///
/// # Examples
///
/// ```
/// use folio_models::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(*policy.max_retries(), 3);
/// assert_eq!(policy.delays().count(), 3);
///
/// assert_eq!(RetryPolicy::disabled().delays().count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    max_retries: usize,
    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    initial_backoff_ms: u64,
    /// Upper bound on any single delay, in seconds
    #[serde(default = "default_max_delay_secs")]
    max_delay_secs: u64,
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_delay_secs() -> u64 {
    30
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl RetryPolicy {
    /// Custom policy.
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_delay_secs: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_delay_secs,
        }
    }

    /// Single attempt, no retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// The delay sequence handed to the retry loop.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(self.initial_backoff_ms.max(1))
            .factor(2)
            .max_delay(Duration::from_secs(self.max_delay_secs))
            .map(jitter)
            .take(self.max_retries)
    }
}
