//! Integration tests for the HTTP proxy client against a mock backend.

mod common;

use common::{client_for, inference_body, log_entry, logs_body, metrics_body, mount_get};
use llm_console::api::{paths, InferenceRequest, InferenceStatus, Strategy};
use llm_console::client::{ClientError, ProxyApi, GENERIC_INFERENCE_ERROR, REQUEST_ID_HEADER};
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(prompt: &str, strategy: Strategy) -> InferenceRequest {
    InferenceRequest {
        prompt: prompt.to_string(),
        strategy,
    }
}

#[tokio::test]
async fn test_infer_posts_prompt_and_strategy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(paths::INFER))
        .and(body_json(json!({ "prompt": "What is 2+2?", "strategy": "fast" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(inference_body()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .infer(&request("What is 2+2?", Strategy::Fast))
        .await
        .unwrap();

    assert_eq!(response.model_used, "model_a");
    assert_eq!(response.latency_ms, 350);
    assert_eq!(response.retry_count, 0);
    assert_eq!(response.status, InferenceStatus::Success);
    assert!(response.fallback_status.is_none());
}

#[tokio::test]
async fn test_infer_error_body_message_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(paths::INFER))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Prompt is required" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .infer(&request("x", Strategy::Accurate))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Http {
            status: 400,
            message: "Prompt is required".to_string()
        }
    );
    assert_eq!(err.user_message(), "Prompt is required");
}

#[tokio::test]
async fn test_infer_non_json_error_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(paths::INFER))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .infer(&request("x", Strategy::Fast))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Http { status: 500, .. }));
    assert_eq!(err.user_message(), GENERIC_INFERENCE_ERROR);
}

#[tokio::test]
async fn test_infer_malformed_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(paths::INFER))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .infer(&request("x", Strategy::Fast))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_logs_sends_limit_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(paths::LOGS))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(logs_body(vec![
            log_entry(2, "second"),
            log_entry(1, "first"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let logs = client_for(&server).logs(20).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].prompt, "second");
    assert_eq!(logs[0].strategy, Strategy::Fast);
}

#[tokio::test]
async fn test_logs_missing_array_is_empty() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        paths::LOGS,
        json!({ "message": "Database not available" }),
    )
    .await;

    let logs = client_for(&server).logs(20).await.unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_metrics_decoding() {
    let server = MockServer::start().await;
    mount_get(&server, paths::LATENCY_METRICS, metrics_body()).await;

    let metrics = client_for(&server).latency_metrics().await.unwrap();
    assert_eq!(metrics.models.len(), 2);
    assert_eq!(metrics.models["model_a"].total_requests, 10);
    assert_eq!(metrics.models["model_a"].error_count(), 1);
    assert_eq!(metrics.time_series.len(), 2);
}

#[tokio::test]
async fn test_metrics_empty_object() {
    let server = MockServer::start().await;
    mount_get(&server, paths::LATENCY_METRICS, json!({ "metrics": {} })).await;

    let metrics = client_for(&server).latency_metrics().await.unwrap();
    assert!(metrics.models.is_empty());
    assert!(metrics.time_series.is_empty());
}

#[tokio::test]
async fn test_health_report() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        paths::HEALTH,
        json!({
            "status": "healthy",
            "timestamp": "2024-01-01T12:00:00.123456",
            "database_connected": true
        }),
    )
    .await;

    let report = client_for(&server).health().await.unwrap();
    assert_eq!(report.status, "healthy");
    assert!(report.database_connected);
    assert!(report.timestamp.is_some());
}

#[tokio::test]
async fn test_every_request_carries_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(paths::HEALTH))
        .and(header_exists(REQUEST_ID_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.health().await.unwrap();
    client.health().await.unwrap();

    let ids: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.headers[REQUEST_ID_HEADER].to_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_unreachable_backend_is_connection_error() {
    // Port 9 (discard) is almost never listening.
    let client = llm_console::client::HttpProxyClient::new("http://127.0.0.1:9", 2).unwrap();
    let err = client.health().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ConnectionFailed(_) | ClientError::Timeout(_)
    ));
}
