//! Infer command implementation

use crate::cli::output::{format_response, to_json};
use crate::cli::InferArgs;
use crate::session::{SessionController, SkipReason, SubmitOutcome};
use crate::view::{PromptStats, ResponseView};
use colored::Colorize;

/// Handle `llm-console infer`
///
/// Runs one submission through the controller. A failed submission becomes
/// the command's error so the process exits non-zero.
pub async fn handle_infer(
    args: &InferArgs,
    controller: &SessionController,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(strategy) = args.strategy {
        controller.set_strategy(strategy);
    }

    match controller.submit_inference(&args.prompt).await {
        SubmitOutcome::Succeeded(response) => {
            if args.json {
                return Ok(to_json(&response)?);
            }
            let stats = PromptStats::for_text(args.prompt.trim());
            Ok(format!(
                "{}\n{}",
                stats.to_string().dimmed(),
                format_response(&ResponseView::from(&response))
            ))
        }
        SubmitOutcome::Failed(message) => Err(message.into()),
        SubmitOutcome::Skipped(SkipReason::EmptyPrompt) => Err("Prompt is empty".into()),
        SubmitOutcome::Skipped(SkipReason::AlreadyLoading) => {
            Err("Another inference is still running".into())
        }
    }
}
