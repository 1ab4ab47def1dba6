//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, MAX_MAX_CHARS, MIN_MAX_CHARS};
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
    /// - `max_body_bytes` is 0 or exceeds 50MiB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `default_max_chars` falls outside the accepted budget range
    /// - `user_agent` is empty
    /// - `continuation_ttl_secs` or `sweep_interval_secs` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_body_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_body_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid {
                field: "max_body_bytes".into(),
                reason: "must not exceed 50MiB".into(),
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

        if !(MIN_MAX_CHARS..=MAX_MAX_CHARS).contains(&self.default_max_chars) {
            return Err(ConfigError::Invalid {
                field: "default_max_chars".into(),
                reason: format!("must be between {MIN_MAX_CHARS} and {MAX_MAX_CHARS}"),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.continuation_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "continuation_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "sweep_interval_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.sweep_interval_secs > self.continuation_ttl_secs {
            tracing::warn!(
                sweep_interval_secs = self.sweep_interval_secs,
                continuation_ttl_secs = self.continuation_ttl_secs,
                "Sweep interval exceeds continuation TTL; \
                 expired entries will linger until the next sweep"
            );
        }

        Ok(())
    }
}
