//! Configuration module for llm-console
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`LLM_CONSOLE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use llm_console::config::ConsoleConfig;
//!
//! let config = ConsoleConfig::default();
//! assert_eq!(config.polling.interval_ms, 5000);
//!
//! let toml = r#"
//! [api]
//! base_url = "http://proxy.internal:9000"
//! "#;
//! let config: ConsoleConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.api.base_url, "http://proxy.internal:9000");
//! ```

pub mod api;
pub mod error;
pub mod logging;
pub mod polling;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::{PollingConfig, SessionConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest history page the console will ask for.
pub const MAX_LOG_LIMIT: u32 = 1000;

/// Unified configuration for the console.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Proxy backend connection
    pub api: ApiConfig,
    /// Background refresh cadence
    pub polling: PollingConfig,
    /// Session defaults
    pub session: SessionConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports LLM_CONSOLE_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("LLM_CONSOLE_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("LLM_CONSOLE_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.api.timeout_seconds = t;
            }
        }

        if let Ok(interval) = std::env::var("LLM_CONSOLE_POLL_INTERVAL_MS") {
            if let Ok(i) = interval.parse() {
                self.polling.interval_ms = i;
            }
        }
        if let Ok(limit) = std::env::var("LLM_CONSOLE_LOG_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.polling.log_limit = l;
            }
        }

        if let Ok(strategy) = std::env::var("LLM_CONSOLE_STRATEGY") {
            if let Ok(s) = strategy.parse() {
                self.session.default_strategy = s;
            }
        }

        if let Ok(level) = std::env::var("LLM_CONSOLE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LLM_CONSOLE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::invalid("api.base_url", "URL cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api.base_url",
                "URL must start with http:// or https://",
            ));
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "api.timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        if self.polling.interval_ms == 0 {
            return Err(ConfigError::invalid(
                "polling.interval_ms",
                "interval must be non-zero",
            ));
        }
        if self.polling.log_limit == 0 || self.polling.log_limit > MAX_LOG_LIMIT {
            return Err(ConfigError::invalid(
                "polling.log_limit",
                format!("limit must be between 1 and {}", MAX_LOG_LIMIT),
            ));
        }

        Ok(())
    }
}
