//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PAGEVAULT_*)
//! 2. TOML config file (if PAGEVAULT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PAGEVAULT_*)
/// 2. TOML config file (if PAGEVAULT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// TCP port the HTTP server listens on.
    ///
    /// Set via PAGEVAULT_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory where fetched payloads are stored, one file per content id.
    ///
    /// Set via PAGEVAULT_BLOB_DIR environment variable.
    #[serde(default = "default_blob_dir")]
    pub blob_dir: PathBuf,

    /// User-Agent string for outbound HTTP requests.
    ///
    /// Set via PAGEVAULT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-attempt HTTP request timeout in milliseconds.
    ///
    /// Set via PAGEVAULT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Freshness window for cache entries, in seconds.
    ///
    /// Set via PAGEVAULT_TTL_SECS environment variable.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of simultaneous outbound fetches.
    ///
    /// Set via PAGEVAULT_MAX_IN_FLIGHT environment variable.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Default and maximum retry attempts per fetch. Caller-supplied retry
    /// limits outside [1, max_retries] fall back to this value.
    ///
    /// Set via PAGEVAULT_MAX_RETRIES environment variable.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between retry attempts, in milliseconds.
    ///
    /// Set via PAGEVAULT_BACKOFF_MS environment variable.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Interval between sweeper passes, in seconds.
    ///
    /// Set via PAGEVAULT_SWEEP_INTERVAL_SECS environment variable.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_port() -> u16 {
    5000
}

fn default_blob_dir() -> PathBuf {
    PathBuf::from("./blobs")
}

fn default_user_agent() -> String {
    "pagevault/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_ttl_secs() -> u64 {
    86_400 // 24h
}

fn default_max_in_flight() -> usize {
    10
}

fn default_max_retries() -> u32 {
    10
}

fn default_backoff_ms() -> u64 {
    1_000
}

fn default_sweep_interval_secs() -> u64 {
    3_600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            blob_dir: default_blob_dir(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            ttl_secs: default_ttl_secs(),
            max_in_flight: default_max_in_flight(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Per-attempt timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Entry freshness window as Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Delay between retry attempts as Duration.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// Interval between sweeper passes as Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PAGEVAULT_`
    /// 2. TOML file from `PAGEVAULT_CONFIG_FILE` (if set)
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

        if let Ok(config_path) = std::env::var("PAGEVAULT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PAGEVAULT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
