//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WEBFETCH_*)
//! 2. TOML config file (if WEBFETCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Smallest accepted character budget per response.
pub const MIN_MAX_CHARS: usize = 200;

/// Largest accepted character budget per response.
pub const MAX_MAX_CHARS: usize = 200_000;

/// Default User-Agent sent with every fetch.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; WebFetch/1.0; +https://github.com/webfetch/webfetch)";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WEBFETCH_*)
/// 2. TOML config file (if WEBFETCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for HTTP requests.
    ///
    /// Set via WEBFETCH_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum response body size in bytes.
    ///
    /// Set via WEBFETCH_MAX_BODY_BYTES environment variable.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Fetch wall-clock timeout in milliseconds.
    ///
    /// Set via WEBFETCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Character budget used when a request does not name one.
    ///
    /// Set via WEBFETCH_DEFAULT_MAX_CHARS environment variable.
    #[serde(default = "default_max_chars")]
    pub default_max_chars: usize,

    /// How long a continuation token stays redeemable, in seconds.
    ///
    /// Set via WEBFETCH_CONTINUATION_TTL_SECS environment variable.
    #[serde(default = "default_continuation_ttl_secs")]
    pub continuation_ttl_secs: u64,

    /// Interval between background expiry sweeps, in seconds.
    ///
    /// Set via WEBFETCH_SWEEP_INTERVAL_SECS environment variable.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Maximum number of redirects followed by the HTTP transport.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024 // 10MiB
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_max_chars() -> usize {
    10_000
}

fn default_continuation_ttl_secs() -> u64 {
    300
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_body_bytes: default_max_body_bytes(),
            timeout_ms: default_timeout_ms(),
            default_max_chars: default_max_chars(),
            continuation_ttl_secs: default_continuation_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Continuation time-to-live as Duration.
    pub fn continuation_ttl(&self) -> Duration {
        Duration::from_secs(self.continuation_ttl_secs)
    }

    /// Sweep interval as Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WEBFETCH_`
    /// 2. TOML file from `WEBFETCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WEBFETCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WEBFETCH_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
