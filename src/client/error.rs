//! Error types for proxy API calls.

use thiserror::Error;

/// Message shown when a failed inference carries no usable error text.
pub const GENERIC_INFERENCE_ERROR: &str = "Failed to get response from LLM";

/// Errors that can occur while talking to the proxy backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Request exceeded the configured timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection refused, DNS failure, reset, etc.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Backend answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 2xx response whose body could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Base URL cannot be used to build requests
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// The single user-facing line for a failed inference.
    ///
    /// Upstream errors surface the backend's `error` field verbatim; every
    /// other failure uses its own description.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Http { .. } => GENERIC_INFERENCE_ERROR.to_string(),
            other => other.to_string(),
        }
    }

    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_seconds: u64) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(timeout_seconds)
        } else if e.is_builder() {
            ClientError::InvalidUrl(e.to_string())
        } else {
            ClientError::ConnectionFailed(e.to_string())
        }
    }
}
