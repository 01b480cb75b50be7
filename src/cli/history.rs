//! Logs and metrics command implementations

use crate::cli::output::{format_chart, format_logs_table, format_metrics_table, to_json};
use crate::cli::{LogsArgs, MetricsArgs};
use crate::config::MAX_LOG_LIMIT;
use crate::session::SessionController;
use crate::view::{latency_chart, metric_cards, DashboardView};
use chrono::Local;

/// Handle `llm-console logs`
pub async fn handle_logs(
    args: &LogsArgs,
    controller: &SessionController,
) -> Result<String, Box<dyn std::error::Error>> {
    let limit = args.limit.unwrap_or(controller.settings().log_limit);
    if limit == 0 || limit > MAX_LOG_LIMIT {
        return Err(format!("limit must be between 1 and {}", MAX_LOG_LIMIT).into());
    }

    if !controller.refresh_logs(limit).await {
        return Err("Failed to fetch logs from the proxy".into());
    }

    let state = controller.snapshot();
    if args.json {
        return Ok(to_json(&state.logs)?);
    }

    let view = DashboardView::from_state(&state);
    Ok(format_logs_table(&view.log_rows, view.logs_empty_message))
}

/// Handle `llm-console metrics`
pub async fn handle_metrics(
    args: &MetricsArgs,
    controller: &SessionController,
) -> Result<String, Box<dyn std::error::Error>> {
    if !controller.refresh_metrics().await {
        return Err("Failed to fetch metrics from the proxy".into());
    }

    let metrics = controller.snapshot().metrics.unwrap_or_default();
    if args.json {
        return Ok(to_json(&metrics)?);
    }

    let mut output = format_metrics_table(&metric_cards(&metrics));
    if let Some(chart) = latency_chart(&metrics, &Local) {
        output.push_str("\n\n");
        output.push_str(&format_chart(&chart));
    }
    Ok(output)
}
