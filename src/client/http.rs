//! reqwest-backed implementation of [`ProxyApi`].

use super::{ClientError, ProxyApi};
use crate::api::{
    paths, ErrorBody, HealthReport, InferenceRequest, InferenceResponse, LogEntry, LogsEnvelope,
    MetricsEnvelope, MetricsSnapshot,
};
use crate::logging::generate_request_id;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::Instrument;

/// Header carrying the client-generated request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the proxy backend with connection pooling.
#[derive(Debug, Clone)]
pub struct HttpProxyClient {
    client: Client,
    /// Base URL without trailing slash (e.g., "http://localhost:8000")
    base_url: String,
    timeout_seconds: u64,
}

impl HttpProxyClient {
    /// Build a client with its own connection pool.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ClientError::ConnectionFailed(format!("failed to build client: {}", e)))?;
        Self::with_client(base_url, timeout_seconds, client)
    }

    /// Use an existing reqwest client (for testing).
    pub fn with_client(
        base_url: &str,
        timeout_seconds: u64,
        client: Client,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            timeout_seconds,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request tagged with a fresh request id.
    async fn send(
        &self,
        endpoint: &'static str,
        builder: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let request_id = generate_request_id();
        let span = tracing::debug_span!("proxy_request", endpoint, request_id = %request_id);

        async {
            let response = builder
                .header(REQUEST_ID_HEADER, &request_id)
                .timeout(Duration::from_secs(self.timeout_seconds))
                .send()
                .await
                .map_err(|e| ClientError::from_reqwest(e, self.timeout_seconds))?;
            tracing::debug!(status = response.status().as_u16(), "Proxy responded");
            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Decode a 2xx body, or turn a non-2xx into [`ClientError::Http`].
    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Extract the backend's `error` field, if the body has one.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_default()
}

#[async_trait]
impl ProxyApi for HttpProxyClient {
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse, ClientError> {
        let builder = self.client.post(self.url(paths::INFER)).json(request);
        let response = self.send(paths::INFER, builder).await?;
        self.decode(response).await
    }

    async fn logs(&self, limit: u32) -> Result<Vec<LogEntry>, ClientError> {
        let builder = self
            .client
            .get(self.url(paths::LOGS))
            .query(&[("limit", limit)]);
        let response = self.send(paths::LOGS, builder).await?;
        let envelope: LogsEnvelope = self.decode(response).await?;
        if let Some(message) = envelope.message {
            tracing::debug!(message = %message, "Proxy attached a note to logs");
        }
        Ok(envelope.logs)
    }

    async fn latency_metrics(&self) -> Result<MetricsSnapshot, ClientError> {
        let builder = self.client.get(self.url(paths::LATENCY_METRICS));
        let response = self.send(paths::LATENCY_METRICS, builder).await?;
        let envelope: MetricsEnvelope = self.decode(response).await?;
        Ok(envelope.metrics)
    }

    async fn health(&self) -> Result<HealthReport, ClientError> {
        let builder = self.client.get(self.url(paths::HEALTH));
        let response = self.send(paths::HEALTH, builder).await?;
        self.decode(response).await
    }
}
