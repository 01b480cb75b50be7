//! Benchmark for building the dashboard view from a full session state

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use llm_console::api::{LogEntry, MetricsSnapshot};
use llm_console::session::SessionState;
use llm_console::view::DashboardView;
use serde_json::json;

fn sample_state(rows: usize) -> SessionState {
    let logs: Vec<LogEntry> = (0..rows)
        .map(|i| {
            serde_json::from_value(json!({
                "id": i,
                "timestamp": "2024-01-01T12:00:00",
                "model_used": if i % 2 == 0 { "model_a" } else { "model_b" },
                "status": if i % 7 == 0 { "retry" } else { "success" },
                "retry_count": i % 3,
                "prompt": "Summarise the tradeoffs between latency and accuracy for this workload",
                "strategy": if i % 2 == 0 { "fast" } else { "accurate" },
                "latency_ms": 200 + i * 10
            }))
            .unwrap()
        })
        .collect();

    let metrics: MetricsSnapshot = serde_json::from_value(json!({
        "models": {
            "model_a": { "total_requests": 120, "success_rate": 0.95, "avg_latency": 480.0 },
            "model_b": { "total_requests": 40, "success_rate": 0.9, "avg_latency": 1400.0 }
        },
        "time_series": (0..60).map(|m| json!({
            "timestamp": format!("2024-01-01T12:{:02}:00", 59 - m),
            "avg_latency": 300.0 + m as f64
        })).collect::<Vec<_>>()
    }))
    .unwrap();

    let mut state = SessionState::default();
    state.logs = logs;
    state.metrics = Some(metrics);
    state
}

fn bench_dashboard_view(c: &mut Criterion) {
    let small = sample_state(20);
    let large = sample_state(1000);

    c.bench_function("dashboard_view_20_rows", |b| {
        b.iter(|| DashboardView::from_state_in(black_box(&small), &Utc))
    });
    c.bench_function("dashboard_view_1000_rows", |b| {
        b.iter(|| DashboardView::from_state_in(black_box(&large), &Utc))
    });
}

criterion_group!(benches, bench_dashboard_view);
criterion_main!(benches);
