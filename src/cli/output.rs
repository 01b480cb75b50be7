//! Output formatting helpers for CLI commands
//!
//! Terminal renderer for [`DashboardView`] and its parts.

use crate::api::HealthReport;
use crate::view::{
    DashboardView, LatencyChart, LogRow, MetricCard, ResponseView, StatusClass,
};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::fmt::Write;

/// Widest bar drawn by [`format_chart`].
const CHART_WIDTH: usize = 40;

fn status_badge(status: &str, class: StatusClass) -> ColoredString {
    match class {
        StatusClass::Success => status.green(),
        StatusClass::Failed => status.red(),
        StatusClass::Retry => status.yellow(),
    }
}

/// Pretty-printed JSON for `--json` output
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Format the response panel
pub fn format_response(response: &ResponseView) -> String {
    let mut output = String::new();
    writeln!(output, "{}", response.text).unwrap();
    writeln!(output).unwrap();
    write!(
        output,
        "{} {} | {} {} | {} {} | {} {}",
        "Model Used:".bold(),
        response.model,
        "Latency:".bold(),
        response.latency,
        "Retries:".bold(),
        response.retries,
        "Status:".bold(),
        status_badge(&response.status, response.status_class),
    )
    .unwrap();
    if let Some(fallback) = &response.fallback {
        write!(output, " | {} {}", "Fallback:".bold(), fallback).unwrap();
    }
    output
}

/// Format history rows as a table
pub fn format_logs_table(rows: &[LogRow], empty_message: Option<&str>) -> String {
    if rows.is_empty() {
        return empty_message.unwrap_or_default().dimmed().to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Time", "Model", "Status", "Retries", "Strategy", "Latency", "Prompt",
    ]);

    for row in rows {
        let retries = match row.retries {
            Some(n) => n.to_string().yellow().to_string(),
            None => String::new(),
        };
        table.add_row(vec![
            Cell::new(&row.time),
            Cell::new(&row.model),
            Cell::new(status_badge(&row.status, row.status_class).to_string()),
            Cell::new(retries),
            Cell::new(row.strategy),
            Cell::new(&row.latency),
            Cell::new(&row.prompt_preview),
        ]);
    }

    table.to_string()
}

/// Format per-model metric cards as a table
pub fn format_metrics_table(cards: &[MetricCard]) -> String {
    if cards.is_empty() {
        return "No metrics in the reporting window.".dimmed().to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Model",
        "Total Requests",
        "Success Rate",
        "Avg Latency",
        "Error Count",
    ]);

    for card in cards {
        let errors = if card.error_count > 0 {
            card.error_count.to_string().red().to_string()
        } else {
            card.error_count.to_string()
        };
        table.add_row(vec![
            Cell::new(&card.description),
            Cell::new(card.total_requests),
            Cell::new(&card.success_rate),
            Cell::new(&card.avg_latency),
            Cell::new(errors),
        ]);
    }

    table.to_string()
}

/// Horizontal bar chart, one line per time bucket
pub fn format_chart(chart: &LatencyChart) -> String {
    let mut output = String::new();
    writeln!(output, "{}", chart.title.bold()).unwrap();

    let max = chart.max_latency();
    for point in &chart.points {
        let width = if max > 0.0 {
            ((point.avg_latency / max) * CHART_WIDTH as f64).round() as usize
        } else {
            0
        };
        writeln!(
            output,
            "{} {} {:.0}ms",
            point.label,
            "█".repeat(width.max(1)).green(),
            point.avg_latency
        )
        .unwrap();
    }

    output
}

/// Full dashboard frame
pub fn format_dashboard(view: &DashboardView) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "{} {} ({}) | {}",
        "Strategy:".bold(),
        view.strategy.model_label.cyan(),
        view.strategy.expected_latency,
        if view.submit.enabled {
            view.submit.label.normal()
        } else {
            view.submit.label.yellow()
        }
    )
    .unwrap();

    if let Some(banner) = &view.error_banner {
        writeln!(output, "{}", banner.red()).unwrap();
    }

    if let Some(response) = &view.response {
        writeln!(output).unwrap();
        writeln!(output, "{}", "Response".bold()).unwrap();
        writeln!(output, "{}", format_response(response)).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "{}", "Metrics".bold()).unwrap();
    writeln!(output, "{}", format_metrics_table(&view.metric_cards)).unwrap();

    if let Some(chart) = &view.latency_chart {
        writeln!(output).unwrap();
        write!(output, "{}", format_chart(chart)).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "{}", "Recent Inference Logs".bold()).unwrap();
    writeln!(
        output,
        "{}",
        format_logs_table(&view.log_rows, view.logs_empty_message)
    )
    .unwrap();

    output
}

/// Format the proxy health report
pub fn format_health(report: &HealthReport, base_url: &str) -> String {
    let mut output = String::new();

    let status_display = if report.status == "healthy" {
        "Healthy".green()
    } else {
        report.status.yellow()
    };
    let database = if report.database_connected {
        "connected".green()
    } else {
        "unavailable".red()
    };

    writeln!(output, "Proxy: {}", base_url).unwrap();
    writeln!(output, "Status: {}", status_display).unwrap();
    write!(output, "Database: {}", database).unwrap();
    if let Some(ts) = report.timestamp {
        write!(output, "\nReported at: {}", ts.to_rfc3339()).unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Strategy;
    use crate::view::{ChartPoint, CHART_TITLE, EMPTY_LOGS_MESSAGE};

    fn row() -> LogRow {
        LogRow {
            time: "12:34:56".to_string(),
            model: "Model A".to_string(),
            status: "SUCCESS".to_string(),
            status_class: StatusClass::Success,
            retries: Some(2),
            prompt_preview: "What is 2+2?".to_string(),
            strategy: Strategy::Fast,
            latency: "350ms".to_string(),
        }
    }

    #[test]
    fn test_logs_table_contains_row_fields() {
        let output = format_logs_table(&[row()], None);
        assert!(output.contains("12:34:56"));
        assert!(output.contains("Model A"));
        assert!(output.contains("SUCCESS"));
        assert!(output.contains("fast"));
        assert!(output.contains("What is 2+2?"));
    }

    #[test]
    fn test_logs_table_empty_message() {
        let output = format_logs_table(&[], Some(EMPTY_LOGS_MESSAGE));
        assert!(output.contains("No inference logs yet"));
    }

    #[test]
    fn test_metrics_table_headers() {
        let cards = vec![MetricCard {
            model: "model_a".to_string(),
            description: "Model A (Fast)".to_string(),
            total_requests: 12,
            success_rate: "91.7%".to_string(),
            avg_latency: "480ms".to_string(),
            error_count: 1,
        }];
        let output = format_metrics_table(&cards);
        assert!(output.contains("Success Rate"));
        assert!(output.contains("Model A (Fast)"));
        assert!(output.contains("91.7%"));
    }

    #[test]
    fn test_chart_bars_scale_to_max() {
        let chart = LatencyChart {
            title: CHART_TITLE,
            points: vec![
                ChartPoint {
                    label: "12:00:00".to_string(),
                    avg_latency: 100.0,
                },
                ChartPoint {
                    label: "12:01:00".to_string(),
                    avg_latency: 400.0,
                },
            ],
        };
        let output = format_chart(&chart);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(&"█".repeat(10)));
        assert!(lines[2].contains(&"█".repeat(40)));
        assert!(lines[2].ends_with("400ms"));
    }

    #[test]
    fn test_health_output() {
        let report = HealthReport {
            status: "healthy".to_string(),
            timestamp: None,
            database_connected: false,
        };
        let output = format_health(&report, "http://localhost:8000");
        assert!(output.contains("http://localhost:8000"));
        assert!(output.contains("Healthy"));
        assert!(output.contains("unavailable"));
    }

    #[test]
    fn test_json_output() {
        let json = to_json(&[row()]).unwrap();
        assert!(json.contains("\"prompt_preview\": \"What is 2+2?\""));
    }
}
