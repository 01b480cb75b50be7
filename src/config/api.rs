//! Proxy backend connection settings

use serde::{Deserialize, Serialize};

/// Where the proxy backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            // Accurate-first inference with retries can take several seconds.
            timeout_seconds: 30,
        }
    }
}
