//! # Proxy API contract
//!
//! Request and response bodies exchanged with the LLM proxy backend.
//!
//! ## Endpoints
//!
//! - `POST /api/infer` - Run one inference with a [`Strategy`]
//! - `GET /api/logs?limit=N` - Most recent inference history rows
//! - `GET /api/metrics/latency` - Per-model aggregates and a latency time series
//! - `GET /api/health` - Backend liveness and database connectivity
//!
//! ## Example
//!
//! ```rust
//! use llm_console::api::{InferenceResponse, InferenceStatus};
//!
//! let body = r#"{"response":"4","model_used":"model_a","latency_ms":350,"retry_count":0,"status":"success"}"#;
//! let response: InferenceResponse = serde_json::from_str(body).unwrap();
//! assert_eq!(response.status, InferenceStatus::Success);
//! ```

pub mod types;

pub use types::{
    parse_timestamp, ErrorBody, HealthReport, InferenceRequest, InferenceResponse,
    InferenceStatus, LogEntry, LogsEnvelope, MetricsEnvelope, MetricsSnapshot, ModelMetrics,
    Strategy, TimeSeriesPoint,
};

/// Endpoint paths relative to the configured base URL.
pub mod paths {
    pub const INFER: &str = "/api/infer";
    pub const LOGS: &str = "/api/logs";
    pub const LATENCY_METRICS: &str = "/api/metrics/latency";
    pub const HEALTH: &str = "/api/health";
}
