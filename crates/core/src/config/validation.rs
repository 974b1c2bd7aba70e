//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `ttl_secs`, `max_in_flight`, or `sweep_interval_secs` is 0
    /// - `max_retries` is outside [1, 10]
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `backoff_ms` exceeds 60 seconds
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "ttl_secs".into(), reason: "must be greater than 0".into() });
        }

        if self.max_in_flight == 0 {
            return Err(ConfigError::Invalid { field: "max_in_flight".into(), reason: "must be at least 1".into() });
        }

        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(ConfigError::Invalid {
                field: "max_retries".into(),
                reason: "must be between 1 and 10".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.backoff_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "backoff_ms".into(),
                reason: "must not exceed 60 seconds (60000ms)".into(),
            });
        }

        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "sweep_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}
