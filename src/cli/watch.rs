//! Watch command implementation
//!
//! Live dashboard: an initial refresh, background polling, and a redraw on
//! every committed state change. Lines typed on stdin are submitted as
//! prompts; `/fast`, `/accurate`, `/refresh` and `/quit` are commands.

use crate::api::Strategy;
use crate::cli::output::format_dashboard;
use crate::cli::WatchArgs;
use crate::config::ConsoleConfig;
use crate::session::SessionController;
use crate::view::DashboardView;
use std::io::BufRead;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

const HELP_LINE: &str =
    "Type a prompt and press Enter. Commands: /fast /accurate /refresh /quit (Ctrl-C exits)";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    SetStrategy(Strategy),
    Refresh,
    Quit,
    Submit(String),
    /// Blank line or unknown slash command
    Ignore,
}

impl InputCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "" => InputCommand::Ignore,
            "/fast" => InputCommand::SetStrategy(Strategy::Fast),
            "/accurate" => InputCommand::SetStrategy(Strategy::Accurate),
            "/refresh" => InputCommand::Refresh,
            "/quit" | "/exit" => InputCommand::Quit,
            cmd if cmd.starts_with('/') => InputCommand::Ignore,
            prompt => InputCommand::Submit(prompt.to_string()),
        }
    }
}

/// Apply one input line. Returns false when the user asked to quit.
fn dispatch(controller: &SessionController, command: InputCommand) -> bool {
    match command {
        InputCommand::SetStrategy(strategy) => controller.set_strategy(strategy),
        InputCommand::Refresh => {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller.refresh_all().await;
            });
        }
        InputCommand::Submit(prompt) => {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller.submit_inference(&prompt).await;
            });
        }
        InputCommand::Quit => return false,
        InputCommand::Ignore => {}
    }
    true
}

fn render(controller: &SessionController) {
    let view = DashboardView::from_state(&controller.snapshot());
    print!("{}{}\n{}\n", CLEAR_SCREEN, format_dashboard(&view), HELP_LINE);
}

/// Forward stdin lines over a channel from a detached OS thread.
///
/// Runs outside the runtime: a pending read must not hold up runtime
/// shutdown. The channel closes on EOF or a read error.
fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    let spawned = std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read input");
                        break;
                    }
                }
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "Failed to start input reader");
    }
    rx
}

/// Cancel `token` on Ctrl-C
async fn shutdown_signal(cancel_token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received SIGINT, shutting down..."),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
    }
    cancel_token.cancel();
}

/// Main watch command handler
pub async fn run_watch(
    args: &WatchArgs,
    config: &ConsoleConfig,
    controller: SessionController,
) -> Result<(), Box<dyn std::error::Error>> {
    let interval = Duration::from_millis(args.interval_ms.unwrap_or(config.polling.interval_ms));
    if interval.is_zero() {
        return Err("interval must be non-zero".into());
    }
    if let Some(strategy) = args.strategy {
        controller.set_strategy(strategy);
    }

    let mut updates = controller.subscribe();
    let cancel_token = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel_token.clone()));

    controller.refresh_all().await;
    controller.start_polling(interval);
    render(&controller);

    let mut input = spawn_input_reader();
    let mut input_open = true;

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&controller);
            }
            line = input.recv(), if input_open => match line {
                Some(line) => {
                    if !dispatch(&controller, InputCommand::parse(&line)) {
                        break;
                    }
                }
                None => input_open = false,
            },
        }
    }

    controller.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        HealthReport, InferenceRequest, InferenceResponse, InferenceStatus, LogEntry,
        MetricsSnapshot,
    };
    use crate::client::{ClientError, ProxyApi};
    use crate::session::{SessionSettings, SkipReason, SubmitOutcome};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// Backend whose `infer` waits on a gate.
    struct GatedApi {
        gate: Arc<Notify>,
        infer_calls: AtomicUsize,
        logs_calls: AtomicUsize,
        strategies: Mutex<Vec<Strategy>>,
    }

    impl GatedApi {
        fn new() -> Self {
            Self {
                gate: Arc::new(Notify::new()),
                infer_calls: AtomicUsize::new(0),
                logs_calls: AtomicUsize::new(0),
                strategies: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProxyApi for GatedApi {
        async fn infer(
            &self,
            request: &InferenceRequest,
        ) -> Result<InferenceResponse, ClientError> {
            self.infer_calls.fetch_add(1, Ordering::SeqCst);
            self.strategies.lock().unwrap().push(request.strategy);
            self.gate.notified().await;
            Ok(InferenceResponse {
                response: "4".to_string(),
                model_used: "model_b".to_string(),
                latency_ms: 900,
                retry_count: 0,
                status: InferenceStatus::Success,
                fallback_status: None,
            })
        }

        async fn logs(&self, _limit: u32) -> Result<Vec<LogEntry>, ClientError> {
            self.logs_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn latency_metrics(&self) -> Result<MetricsSnapshot, ClientError> {
            Ok(MetricsSnapshot::default())
        }

        async fn health(&self) -> Result<HealthReport, ClientError> {
            Err(ClientError::ConnectionFailed("unused".to_string()))
        }
    }

    async fn wait_until(controller: &SessionController, loading: bool) {
        while controller.snapshot().is_loading != loading {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_dispatch_strategy_then_prompt() {
        let api = Arc::new(GatedApi::new());
        let controller = SessionController::new(api.clone(), SessionSettings::default());

        assert!(dispatch(&controller, InputCommand::parse("/accurate")));
        assert_eq!(controller.snapshot().strategy, Strategy::Accurate);
        assert_eq!(api.infer_calls.load(Ordering::SeqCst), 0);

        assert!(dispatch(&controller, InputCommand::parse("What is 2+2?")));
        wait_until(&controller, true).await;

        // While the first prompt is in flight the loop keeps running and a
        // second prompt is skipped by the controller.
        assert!(dispatch(&controller, InputCommand::parse("again")));
        assert_eq!(
            controller.submit_inference("direct").await,
            SubmitOutcome::Skipped(SkipReason::AlreadyLoading)
        );
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(api.infer_calls.load(Ordering::SeqCst), 1);

        api.gate.notify_one();
        wait_until(&controller, false).await;
        let state = controller.snapshot();
        assert_eq!(state.current_response.unwrap().model_used, "model_b");
        assert_eq!(*api.strategies.lock().unwrap(), vec![Strategy::Accurate]);
        controller.shutdown();
    }

    #[tokio::test]
    async fn test_dispatch_refresh_and_quit() {
        let api = Arc::new(GatedApi::new());
        let controller = SessionController::new(api.clone(), SessionSettings::default());

        assert!(dispatch(&controller, InputCommand::Refresh));
        while api.logs_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(dispatch(&controller, InputCommand::parse("/fast")));
        assert_eq!(controller.snapshot().strategy, Strategy::Fast);
        assert!(dispatch(&controller, InputCommand::Ignore));
        assert!(!dispatch(&controller, InputCommand::parse("/quit")));
        assert_eq!(api.infer_calls.load(Ordering::SeqCst), 0);
        controller.shutdown();
    }

    #[test]
    fn test_parse_prompt() {
        assert_eq!(
            InputCommand::parse("  What is 2+2?  "),
            InputCommand::Submit("What is 2+2?".to_string())
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            InputCommand::parse("/accurate"),
            InputCommand::SetStrategy(Strategy::Accurate)
        );
        assert_eq!(
            InputCommand::parse("/fast"),
            InputCommand::SetStrategy(Strategy::Fast)
        );
        assert_eq!(InputCommand::parse("/refresh"), InputCommand::Refresh);
        assert_eq!(InputCommand::parse("/quit"), InputCommand::Quit);
        assert_eq!(InputCommand::parse("/exit"), InputCommand::Quit);
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(InputCommand::parse("   "), InputCommand::Ignore);
        assert_eq!(InputCommand::parse("/balanced"), InputCommand::Ignore);
    }
}
