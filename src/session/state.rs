//! Session state and its transitions.

use crate::api::{InferenceResponse, LogEntry, MetricsSnapshot, Strategy};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where the current (or most recent) submission stands.
///
/// `Succeeded` and `Failed` record how the last submission ended; like
/// `Idle` they accept a new submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Everything the rendering layer may show.
///
/// Only the controller mutates it, and every mutation is committed as a
/// whole, so a snapshot is always internally consistent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub strategy: Strategy,
    pub phase: SessionPhase,
    /// True strictly between dispatch and the terminal outcome of a submission
    pub is_loading: bool,
    pub current_response: Option<InferenceResponse>,
    pub last_error: Option<String>,
    /// Newest first, exactly as the backend returned them
    pub logs: Vec<LogEntry>,
    pub metrics: Option<MetricsSnapshot>,
    pub last_logs_refresh: Option<DateTime<Utc>>,
    pub last_metrics_refresh: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            phase: SessionPhase::Idle,
            is_loading: false,
            current_response: None,
            last_error: None,
            logs: Vec::new(),
            metrics: None,
            last_logs_refresh: None,
            last_metrics_refresh: None,
        }
    }

    /// Enter `Loading`. Returns false, changing nothing, if already loading.
    pub(crate) fn begin_submission(&mut self) -> bool {
        if self.is_loading {
            return false;
        }
        self.phase = SessionPhase::Loading;
        self.is_loading = true;
        self.last_error = None;
        self.current_response = None;
        true
    }

    pub(crate) fn finish_success(&mut self, response: InferenceResponse) {
        self.phase = SessionPhase::Succeeded;
        self.is_loading = false;
        self.last_error = None;
        self.current_response = Some(response);
    }

    pub(crate) fn finish_failure(&mut self, message: String) {
        self.phase = SessionPhase::Failed;
        self.is_loading = false;
        self.current_response = None;
        self.last_error = Some(message);
    }

    /// Replace the whole history, even with an empty page.
    pub(crate) fn replace_logs(&mut self, logs: Vec<LogEntry>) {
        self.logs = logs;
        self.last_logs_refresh = Some(Utc::now());
    }

    pub(crate) fn replace_metrics(&mut self, metrics: MetricsSnapshot) {
        self.metrics = Some(metrics);
        self.last_metrics_refresh = Some(Utc::now());
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}

/// What `submit_inference` did. Informational only; the state carries the
/// user-visible result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent
    Skipped(SkipReason),
    Succeeded(InferenceResponse),
    /// Carries the message stored in `last_error`
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Prompt was empty after trimming
    EmptyPrompt,
    /// Another submission is still in flight
    AlreadyLoading,
}

/// Which background refreshes replaced their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshReport {
    pub logs: bool,
    pub metrics: bool,
}
