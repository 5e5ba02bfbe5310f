//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MENTOR_ROSTER` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working setup.
//!
//! # Example
//!
//! ```no_run
//! use mentor_roster::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Retrying conflicts up to {} times", config.coordination.max_attempts);
//! ```

mod booking;
mod coordination;
mod error;
mod logging;
mod store;

pub use booking::BookingConfig;
pub use coordination::CoordinationConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use store::StoreConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Record store layout (collection, ordering field)
    #[serde(default)]
    pub store: StoreConfig,

    /// Conflict retry behaviour for roster writes
    #[serde(default)]
    pub coordination: CoordinationConfig,

    /// Booking guard policy
    #[serde(default)]
    pub booking: BookingConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MENTOR_ROSTER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MENTOR_ROSTER__COORDINATION__MAX_ATTEMPTS=8` -> `coordination.max_attempts = 8`
    /// - `MENTOR_ROSTER__BOOKING__CAPACITY_POLICY=hard` -> `booking.capacity_policy = Hard`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MENTOR_ROSTER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.store.validate()?;
        self.coordination.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roster::CapacityPolicy;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MENTOR_ROSTER__STORE__SESSIONS_COLLECTION",
        "MENTOR_ROSTER__COORDINATION__MAX_ATTEMPTS",
        "MENTOR_ROSTER__COORDINATION__RETRY_BACKOFF_MS",
        "MENTOR_ROSTER__BOOKING__CAPACITY_POLICY",
        "MENTOR_ROSTER__BOOKING__ENFORCE_SINGLE_ACTIVE_BOOKING",
        "MENTOR_ROSTER__LOGGING__FORMAT",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.store.sessions_collection, "sessions");
        assert_eq!(config.coordination.max_attempts, 5);
        assert_eq!(config.booking.capacity_policy, CapacityPolicy::Soft);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MENTOR_ROSTER__COORDINATION__MAX_ATTEMPTS", "8");
        env::set_var("MENTOR_ROSTER__BOOKING__CAPACITY_POLICY", "hard");
        env::set_var("MENTOR_ROSTER__BOOKING__ENFORCE_SINGLE_ACTIVE_BOOKING", "false");
        env::set_var("MENTOR_ROSTER__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.coordination.max_attempts, 8);
        assert_eq!(config.booking.capacity_policy, CapacityPolicy::Hard);
        assert!(!config.booking.enforce_single_active_booking);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validated_load_rejects_zero_attempts() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MENTOR_ROSTER__COORDINATION__MAX_ATTEMPTS", "0");
        let result = AppConfig::load_validated();
        clear_env();

        assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
