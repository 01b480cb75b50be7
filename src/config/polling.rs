//! Refresh cadence and session defaults

use crate::api::Strategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timer settings for logs/metrics refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Milliseconds between background refreshes
    pub interval_ms: u64,
    /// Milliseconds to wait after a successful inference before refreshing,
    /// so the backend has written its log row
    pub post_submit_delay_ms: u64,
    /// Number of history rows requested per refresh
    pub log_limit: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            post_submit_delay_ms: 1000,
            log_limit: 20,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn post_submit_delay(&self) -> Duration {
        Duration::from_millis(self.post_submit_delay_ms)
    }
}

/// Session defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub default_strategy: Strategy,
}
