//! Shared fixtures for llm-console integration tests.
//!
//! JSON bodies shaped like the proxy's responses, plus helpers that mount
//! them on a wiremock server.

#![allow(dead_code)]

use llm_console::api::paths;
use llm_console::client::HttpProxyClient;
use llm_console::session::{SessionController, SessionSettings};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Successful inference body for the fast model.
pub fn inference_body() -> Value {
    json!({
        "response": "2+2 equals 4.",
        "model_used": "model_a",
        "latency_ms": 350,
        "retry_count": 0,
        "status": "success",
        "fallback_status": null
    })
}

pub fn log_entry(id: i64, prompt: &str) -> Value {
    json!({
        "id": id,
        "timestamp": "2024-01-01T12:00:00",
        "model_used": "model_a",
        "status": "success",
        "retry_count": 0,
        "prompt": prompt,
        "strategy": "fast",
        "latency_ms": 350,
        "response": "ok"
    })
}

pub fn logs_body(entries: Vec<Value>) -> Value {
    json!({ "logs": entries, "message": null })
}

pub fn metrics_body() -> Value {
    json!({
        "metrics": {
            "models": {
                "model_a": { "total_requests": 10, "success_rate": 0.9, "avg_latency": 420.5 },
                "model_b": { "total_requests": 4, "success_rate": 1.0, "avg_latency": 1500.0, "error_count": 0 }
            },
            "time_series": [
                { "timestamp": "2024-01-01T12:05:00", "avg_latency": 500.0 },
                { "timestamp": "2024-01-01T12:00:00", "avg_latency": 300.0 }
            ]
        }
    })
}

/// Mount `body` as the JSON response for `GET <endpoint>`.
pub async fn mount_get(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount logs and metrics endpoints with one log row each.
pub async fn mount_history(server: &MockServer) {
    mount_get(server, paths::LOGS, logs_body(vec![log_entry(1, "hello")])).await;
    mount_get(server, paths::LATENCY_METRICS, metrics_body()).await;
}

pub fn client_for(server: &MockServer) -> HttpProxyClient {
    HttpProxyClient::new(&server.uri(), 5).unwrap()
}

/// Controller against `server` with a short follow-up delay.
pub fn controller_for(server: &MockServer) -> SessionController {
    let settings = SessionSettings {
        post_submit_delay: Duration::from_millis(50),
        ..SessionSettings::default()
    };
    SessionController::new(Arc::new(client_for(server)), settings)
}

/// Number of requests the server has seen for `endpoint`.
pub async fn hits(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == endpoint)
        .count()
}
