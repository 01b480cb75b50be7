//! View model for the console.
//!
//! [`DashboardView::from_state`] maps a [`SessionState`] snapshot to plain
//! display data: labels, formatted numbers and ordered rows. It holds no
//! reference to the controller and performs no I/O, so any renderer (the
//! terminal tables in `cli::output`, or something else) can consume it.

pub mod format;

use crate::api::{InferenceResponse, InferenceStatus, LogEntry, MetricsSnapshot, Strategy};
use crate::session::SessionState;
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::fmt::Display;

/// Shown in place of the history table when there are no rows.
pub const EMPTY_LOGS_MESSAGE: &str = "No inference logs yet. Try sending a prompt!";

pub const CHART_TITLE: &str = "Latency Over Time";

/// Which model the selected strategy favours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyIndicator {
    pub strategy: Strategy,
    pub model_label: &'static str,
    pub expected_latency: &'static str,
}

impl From<Strategy> for StrategyIndicator {
    fn from(strategy: Strategy) -> Self {
        let (model_label, expected_latency) = match strategy {
            Strategy::Fast => ("Model A (Fast)", "200-800ms"),
            Strategy::Accurate => ("Model B (Accurate)", "800-2000ms"),
        };
        Self {
            strategy,
            model_label,
            expected_latency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: &'static str,
}

/// Colour class of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Success,
    Failed,
    Retry,
}

impl From<InferenceStatus> for StatusClass {
    fn from(status: InferenceStatus) -> Self {
        match status {
            InferenceStatus::Success => StatusClass::Success,
            InferenceStatus::Failed => StatusClass::Failed,
            InferenceStatus::Retry => StatusClass::Retry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseView {
    pub text: String,
    pub model: String,
    pub latency: String,
    pub retries: u32,
    pub status: String,
    pub status_class: StatusClass,
    pub fallback: Option<String>,
}

impl ResponseView {
    /// One-line summary: `Model Used: model_a | Latency: 350ms | ...`
    pub fn details(&self) -> String {
        let mut line = format!(
            "Model Used: {} | Latency: {} | Retries: {} | Status: {}",
            self.model, self.latency, self.retries, self.status
        );
        if let Some(fallback) = &self.fallback {
            line.push_str(&format!(" | Fallback: {}", fallback));
        }
        line
    }
}

impl From<&InferenceResponse> for ResponseView {
    fn from(response: &InferenceResponse) -> Self {
        Self {
            text: response.response.clone(),
            model: response.model_used.clone(),
            latency: format::latency_ms(response.latency_ms),
            retries: response.retry_count,
            status: response.status.to_string(),
            status_class: response.status.into(),
            fallback: response.fallback_status.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRow {
    pub time: String,
    pub model: String,
    pub status: String,
    pub status_class: StatusClass,
    /// Present only when the backend retried
    pub retries: Option<u32>,
    pub prompt_preview: String,
    pub strategy: Strategy,
    pub latency: String,
}

impl LogRow {
    pub fn from_entry<Tz>(entry: &LogEntry, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            time: format::time_of_day(&entry.timestamp, tz),
            model: format::model_short_name(&entry.model_used),
            status: entry.status.as_str().to_uppercase(),
            status_class: entry.status.into(),
            retries: (entry.retry_count > 0).then_some(entry.retry_count),
            prompt_preview: format::prompt_preview(&entry.prompt),
            strategy: entry.strategy,
            latency: format::latency_ms(entry.latency_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub model: String,
    pub description: String,
    pub total_requests: u64,
    pub success_rate: String,
    pub avg_latency: String,
    pub error_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub avg_latency: f64,
}

/// Latency series in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyChart {
    pub title: &'static str,
    pub points: Vec<ChartPoint>,
}

impl LatencyChart {
    pub fn max_latency(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.avg_latency)
            .fold(0.0, f64::max)
    }
}

/// Character count and token estimate for a draft prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptStats {
    pub chars: usize,
    /// Absent for an empty prompt
    pub token_estimate: Option<usize>,
}

impl PromptStats {
    pub fn for_text(text: &str) -> Self {
        let chars = text.chars().count();
        Self {
            chars,
            token_estimate: (chars > 0).then(|| format::token_estimate(chars)),
        }
    }
}

impl std::fmt::Display for PromptStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Characters: {}", self.chars)?;
        if let Some(tokens) = self.token_estimate {
            write!(f, " • Est. tokens: ~{}", tokens)?;
        }
        Ok(())
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub strategy: StrategyIndicator,
    pub submit: SubmitControl,
    pub error_banner: Option<String>,
    pub response: Option<ResponseView>,
    pub log_rows: Vec<LogRow>,
    pub logs_empty_message: Option<&'static str>,
    pub metric_cards: Vec<MetricCard>,
    pub latency_chart: Option<LatencyChart>,
}

impl DashboardView {
    /// Build the view with timestamps in the local time zone.
    pub fn from_state(state: &SessionState) -> Self {
        Self::from_state_in(state, &Local)
    }

    /// Build the view with timestamps in `tz`.
    pub fn from_state_in<Tz>(state: &SessionState, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let log_rows: Vec<LogRow> = state
            .logs
            .iter()
            .map(|entry| LogRow::from_entry(entry, tz))
            .collect();

        Self {
            strategy: state.strategy.into(),
            submit: submit_control(state.is_loading),
            error_banner: state
                .last_error
                .as_ref()
                .map(|message| format!("Error: {}", message)),
            response: state.current_response.as_ref().map(ResponseView::from),
            logs_empty_message: log_rows.is_empty().then_some(EMPTY_LOGS_MESSAGE),
            log_rows,
            metric_cards: state
                .metrics
                .as_ref()
                .map(metric_cards)
                .unwrap_or_default(),
            latency_chart: state
                .metrics
                .as_ref()
                .and_then(|metrics| latency_chart(metrics, tz)),
        }
    }
}

fn submit_control(is_loading: bool) -> SubmitControl {
    if is_loading {
        SubmitControl {
            enabled: false,
            label: "Processing...",
        }
    } else {
        SubmitControl {
            enabled: true,
            label: "Send Query",
        }
    }
}

/// One card per model, ordered by model id.
pub fn metric_cards(metrics: &MetricsSnapshot) -> Vec<MetricCard> {
    metrics
        .models
        .iter()
        .map(|(model, m)| MetricCard {
            model: model.clone(),
            description: format::model_description(model),
            total_requests: m.total_requests,
            success_rate: format::success_rate(m.success_rate),
            avg_latency: format::average_latency(m.avg_latency),
            error_count: m.error_count(),
        })
        .collect()
}

/// The backend reports newest first; charts read oldest to newest.
pub fn latency_chart<Tz>(metrics: &MetricsSnapshot, tz: &Tz) -> Option<LatencyChart>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if metrics.time_series.is_empty() {
        return None;
    }

    let points = metrics
        .time_series
        .iter()
        .rev()
        .map(|point| ChartPoint {
            label: format::time_of_day(&point.timestamp, tz),
            avg_latency: point.avg_latency,
        })
        .collect();

    Some(LatencyChart {
        title: CHART_TITLE,
        points,
    })
}
