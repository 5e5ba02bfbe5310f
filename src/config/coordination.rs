//! Optimistic write coordination settings

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on `max_attempts`.
pub const MAX_ATTEMPTS_LIMIT: u32 = 50;

/// Upper bound on `retry_backoff_ms`.
pub const MAX_BACKOFF_MS: u64 = 5_000;

/// Retry behaviour of conditional roster writes
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CoordinationConfig {
    /// Attempts before a conflicting write gives up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff step in milliseconds; attempt `n` waits `n * step`
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl CoordinationConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Validate coordination configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ValidationError::InvalidMaxAttempts {
                max: MAX_ATTEMPTS_LIMIT,
                actual: self.max_attempts,
            });
        }
        if self.retry_backoff_ms > MAX_BACKOFF_MS {
            return Err(ValidationError::BackoffTooLarge {
                max: MAX_BACKOFF_MS,
                actual: self.retry_backoff_ms,
            });
        }
        Ok(())
    }
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_backoff_ms() -> u64 {
    10
}
