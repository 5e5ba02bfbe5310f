//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("max_attempts must be between 1 and {max}, got {actual}")]
    InvalidMaxAttempts { max: u32, actual: u32 },

    #[error("retry_backoff_ms must not exceed {max}, got {actual}")]
    BackoffTooLarge { max: u64, actual: u64 },

    #[error("Invalid log level directive: {0}")]
    InvalidLogLevel(String),
}
