//! Proxy backend client.
//!
//! [`ProxyApi`] is the seam between the session controller and the network:
//! the controller only ever talks to `Arc<dyn ProxyApi>`, so tests and
//! alternative transports can stand in for [`HttpProxyClient`].

mod error;
mod http;

pub use error::{ClientError, GENERIC_INFERENCE_ERROR};
pub use http::{HttpProxyClient, REQUEST_ID_HEADER};

use crate::api::{HealthReport, InferenceRequest, InferenceResponse, LogEntry, MetricsSnapshot};
use async_trait::async_trait;

/// Operations the console needs from the proxy backend.
///
/// # Object Safety
///
/// Used as `Arc<dyn ProxyApi>`; async methods go through `async_trait`.
///
/// # Cancellation Safety
///
/// Dropping a returned future abandons the HTTP request. No method mutates
/// client-side state.
#[async_trait]
pub trait ProxyApi: Send + Sync + 'static {
    /// `POST /api/infer`
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse, ClientError>;

    /// `GET /api/logs?limit=N`, newest first.
    async fn logs(&self, limit: u32) -> Result<Vec<LogEntry>, ClientError>;

    /// `GET /api/metrics/latency`
    async fn latency_metrics(&self) -> Result<MetricsSnapshot, ClientError>;

    /// `GET /api/health`
    async fn health(&self) -> Result<HealthReport, ClientError>;
}
