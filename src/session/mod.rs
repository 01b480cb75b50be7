//! Session controller.
//!
//! Owns the console's [`SessionState`], mediates every call to the proxy
//! backend and runs the background refresh timer. State lives in a
//! `tokio::sync::watch` channel: each operation commits its changes in a
//! single closure, so subscribers never observe a half-applied update.

mod state;


pub use state::{RefreshReport, SessionPhase, SessionState, SkipReason, SubmitOutcome};

use crate::api::{InferenceRequest, Strategy};
use crate::client::ProxyApi;
use crate::config::ConsoleConfig;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Error recorded when a submission future is dropped before it finished.
pub const CANCELLED_MESSAGE: &str = "inference request cancelled";

/// Timing knobs for the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub initial_strategy: Strategy,
    /// Rows requested by every logs refresh
    pub log_limit: u32,
    /// Delay between a successful inference and its one-shot refresh
    pub post_submit_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            initial_strategy: Strategy::Fast,
            log_limit: 20,
            post_submit_delay: Duration::from_millis(1000),
        }
    }
}

impl From<&ConsoleConfig> for SessionSettings {
    fn from(config: &ConsoleConfig) -> Self {
        Self {
            initial_strategy: config.session.default_strategy,
            log_limit: config.polling.log_limit,
            post_submit_delay: config.polling.post_submit_delay(),
        }
    }
}

/// Handle to the running poll task.
struct Poller {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

struct Inner {
    api: Arc<dyn ProxyApi>,
    settings: SessionSettings,
    state: watch::Sender<SessionState>,
    poller: Mutex<Option<Poller>>,
    /// Parent of every timer this controller spawns
    shutdown: CancellationToken,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Single owner of session state. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    pub fn new(api: Arc<dyn ProxyApi>, settings: SessionSettings) -> Self {
        let (state, _) = watch::channel(SessionState::new(settings.initial_strategy));
        Self {
            inner: Arc::new(Inner {
                api,
                settings,
                state,
                poller: Mutex::new(None),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.inner.settings
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified after every committed change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Select the strategy used by the next submission.
    pub fn set_strategy(&self, strategy: Strategy) {
        self.inner.state.send_if_modified(|s| {
            if s.strategy == strategy {
                return false;
            }
            s.strategy = strategy;
            true
        });
        tracing::debug!(strategy = %strategy, "Strategy selected");
    }

    /// Submit a prompt with the current strategy.
    ///
    /// Blank prompts and submissions made while another is in flight are
    /// ignored. Failures end up in `last_error`; nothing is returned as `Err`.
    pub async fn submit_inference(&self, prompt: &str) -> SubmitOutcome {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            tracing::debug!("Ignoring blank prompt");
            return SubmitOutcome::Skipped(SkipReason::EmptyPrompt);
        }

        let mut strategy = Strategy::default();
        let started = self.inner.state.send_if_modified(|s| {
            let started = s.begin_submission();
            strategy = s.strategy;
            started
        });
        if !started {
            tracing::debug!("Submission already in flight, ignoring");
            return SubmitOutcome::Skipped(SkipReason::AlreadyLoading);
        }

        let guard = LoadingGuard::new(&self.inner.state);
        let request = InferenceRequest {
            prompt: prompt.to_string(),
            strategy,
        };

        tracing::info!(
            strategy = %strategy,
            prompt_chars = prompt.chars().count(),
            "Submitting inference"
        );

        match self.inner.api.infer(&request).await {
            Ok(response) => {
                tracing::info!(
                    model_used = %response.model_used,
                    latency_ms = response.latency_ms,
                    retry_count = response.retry_count,
                    status = %response.status,
                    "Inference completed"
                );
                let committed = response.clone();
                guard.finish(|s| s.finish_success(committed));
                self.schedule_follow_up_refresh();
                SubmitOutcome::Succeeded(response)
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!(error = %e, "Inference failed");
                let committed = message.clone();
                guard.finish(|s| s.finish_failure(committed));
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Replace the log history with the newest `limit` rows.
    ///
    /// Failures keep the previous rows and are only logged.
    pub async fn refresh_logs(&self, limit: u32) -> bool {
        match self.inner.api.logs(limit).await {
            Ok(logs) => {
                tracing::debug!(count = logs.len(), "Logs refreshed");
                self.inner.state.send_modify(|s| s.replace_logs(logs));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch logs");
                false
            }
        }
    }

    /// Replace the metrics snapshot. Failures keep the previous snapshot.
    pub async fn refresh_metrics(&self) -> bool {
        match self.inner.api.latency_metrics().await {
            Ok(metrics) => {
                tracing::debug!(models = metrics.models.len(), "Metrics refreshed");
                self.inner.state.send_modify(|s| s.replace_metrics(metrics));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch metrics");
                false
            }
        }
    }

    /// Refresh logs (with the configured limit) and metrics concurrently.
    pub async fn refresh_all(&self) -> RefreshReport {
        let (logs, metrics) = futures::join!(
            self.refresh_logs(self.inner.settings.log_limit),
            self.refresh_metrics()
        );
        RefreshReport { logs, metrics }
    }

    /// Start refreshing every `interval`, first tick one interval from now.
    ///
    /// Returns false without starting anything if a poller is already
    /// running (its interval is kept), if `interval` is zero, or after
    /// [`shutdown`](Self::shutdown).
    pub fn start_polling(&self, interval: Duration) -> bool {
        if interval.is_zero() {
            tracing::warn!("Refusing to poll with a zero interval");
            return false;
        }
        if self.inner.shutdown.is_cancelled() {
            return false;
        }

        let mut slot = self
            .inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|p| !p.task.is_finished()) {
            tracing::debug!("Polling already running");
            return false;
        }

        let cancel = self.inner.shutdown.child_token();
        let task = tokio::spawn(poll_loop(
            Arc::downgrade(&self.inner),
            interval,
            cancel.clone(),
        ));
        *slot = Some(Poller { cancel, task });

        tracing::info!(interval_ms = interval.as_millis() as u64, "Polling started");
        true
    }

    /// Stop the refresh timer. A refresh already in flight still applies.
    ///
    /// Returns whether a poller was running.
    pub fn stop_polling(&self) -> bool {
        let poller = self
            .inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match poller {
            Some(p) => {
                p.cancel.cancel();
                tracing::info!("Polling stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|p| !p.cancel.is_cancelled() && !p.task.is_finished())
    }

    /// Stop polling and drop any pending post-submission refresh.
    pub fn shutdown(&self) {
        self.stop_polling();
        self.inner.shutdown.cancel();
    }

    fn schedule_follow_up_refresh(&self) {
        let controller = self.clone();
        let delay = self.inner.settings.post_submit_delay;
        let shutdown = self.inner.shutdown.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let report = controller.refresh_all().await;
                    tracing::debug!(?report, "Post-submission refresh completed");
                }
            }
        });
    }
}

/// Timer body. Holds only a weak reference so an abandoned controller
/// does not keep itself alive through its own poller.
async fn poll_loop(inner: Weak<Inner>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Some(strong) = inner.upgrade() else { break };
                let controller = SessionController { inner: strong };
                let report = controller.refresh_all().await;
                tracing::debug!(?report, "Poll tick completed");
            }
        }
    }
}

/// Leaves `Loading` exactly once: through [`finish`](Self::finish), or on
/// drop if the submitting future was abandoned.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionState>,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<SessionState>) -> Self {
        Self { state, armed: true }
    }

    fn finish(mut self, commit: impl FnOnce(&mut SessionState)) {
        self.armed = false;
        self.state.send_modify(commit);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Inference abandoned before completion");
            self.state
                .send_modify(|s| s.finish_failure(CANCELLED_MESSAGE.to_string()));
        }
    }
}
