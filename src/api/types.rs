//! Wire types for the LLM proxy backend.
//!
//! These mirror the JSON bodies of `/api/infer`, `/api/logs`,
//! `/api/metrics/latency` and `/api/health`. Responses are immutable once
//! received; the session only ever replaces them wholesale.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Model selection strategy sent with every inference request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Lower latency, tries `model_a` first
    #[default]
    Fast,
    /// Higher latency, tries `model_b` first
    Accurate,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Fast => "fast",
            Strategy::Accurate => "accurate",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Strategy::Fast),
            "accurate" => Ok(Strategy::Accurate),
            _ => Err(format!("Invalid strategy: {} (expected fast or accurate)", s)),
        }
    }
}

/// Outcome reported by the backend for one inference.
///
/// Anything other than `success` or `failed` is treated as `retry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferenceStatus {
    Success,
    Failed,
    Retry,
}

impl InferenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceStatus::Success => "success",
            InferenceStatus::Failed => "failed",
            InferenceStatus::Retry => "retry",
        }
    }

    fn from_wire(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "success" => InferenceStatus::Success,
            "failed" => InferenceStatus::Failed,
            _ => InferenceStatus::Retry,
        }
    }
}

impl fmt::Display for InferenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InferenceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InferenceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

/// Body of `POST /api/infer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub prompt: String,
    pub strategy: Strategy,
}

/// Successful body of `POST /api/infer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub response: String,
    /// `model_a`, `model_b`, or `none` when every attempt failed
    pub model_used: String,
    pub latency_ms: u64,
    pub retry_count: u32,
    pub status: InferenceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_status: Option<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// One row of the backend's inference history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub model_used: String,
    pub status: InferenceStatus,
    #[serde(default)]
    pub retry_count: u32,
    pub prompt: String,
    #[serde(deserialize_with = "deserialize_logged_strategy")]
    pub strategy: Strategy,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_status: Option<String>,
}

/// Body of `GET /api/logs`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogsEnvelope {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    /// Set by the backend when its database is unavailable
    #[serde(default)]
    pub message: Option<String>,
}

/// Aggregates for one model over the backend's reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    #[serde(default)]
    pub total_requests: u64,
    /// Fraction in `[0, 1]`
    #[serde(default)]
    pub success_rate: f64,
    /// Milliseconds
    #[serde(default)]
    pub avg_latency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_count: Option<u64>,
}

impl ModelMetrics {
    /// Failed requests, derived from the success rate when the backend omits it.
    pub fn error_count(&self) -> u64 {
        self.error_count.unwrap_or_else(|| {
            let rate = self.success_rate.clamp(0.0, 1.0);
            (self.total_requests as f64 * (1.0 - rate)).round() as u64
        })
    }
}

/// One bucket of the latency time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub avg_latency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_count: Option<u64>,
}

/// Latency metrics snapshot. The backend sends `time_series` newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub models: BTreeMap<String, ModelMetrics>,
    #[serde(default)]
    pub time_series: Vec<TimeSeriesPoint>,
}

/// Body of `GET /api/metrics/latency`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsEnvelope {
    #[serde(default)]
    pub metrics: MetricsSnapshot,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub database_connected: bool,
}

/// Parse an ISO-8601 timestamp, accepting naive values as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// The backend stores the strategy string verbatim and routes anything that
/// is not `fast` accurate-first, so history rows follow the same rule.
fn deserialize_logged_strategy<'de, D>(deserializer: D) -> Result<Strategy, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or(Strategy::Accurate))
}
