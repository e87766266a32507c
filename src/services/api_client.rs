//! HTTP client for the retrieval/generation service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ExplorerError, ExplorerResult};
use crate::models::{ApiErrorBody, GenerateRequest, GenerateResponse, HealthStatus};

/// The remote operations the session depends on
#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Retrieve chunks and generate an answer for one request
    async fn generate(&self, request: &GenerateRequest) -> ExplorerResult<GenerateResponse>;

    /// Liveness probe
    async fn check_health(&self) -> ExplorerResult<HealthStatus>;
}

/// Client for the retrieval service. Every call is a single attempt.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ExplorerResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ExplorerError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ExplorerResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response.json::<T>().await.map_err(|e| {
            ExplorerError::transport(
                Some(status.as_u16()),
                format!("Invalid response body: {}", e),
            )
        })
    }

    /// Prefer the service's `detail`, fall back to the status line
    async fn error_from_response(response: Response) -> ExplorerError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message())
            .unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                )
            });

        ExplorerError::transport(Some(status.as_u16()), message)
    }
}

#[async_trait]
impl RetrievalService for ApiClient {
    async fn generate(&self, request: &GenerateRequest) -> ExplorerResult<GenerateResponse> {
        let url = format!("{}/generate", self.base_url);
        debug!(
            mode = %request.retrieval_mode,
            role = %request.role,
            rerank = request.rerank,
            top_k = request.top_k,
            "POST {}",
            url
        );

        let response = self.client.post(&url).json(request).send().await.map_err(|e| {
            warn!("Generate request failed: {}", e);
            ExplorerError::from(e)
        })?;

        let result: GenerateResponse = Self::read_json(response).await?;
        debug!(chunks = result.retrieved_chunks.len(), "Generate succeeded");

        Ok(result)
    }

    async fn check_health(&self) -> ExplorerResult<HealthStatus> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::sample_response;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn wire_request() -> GenerateRequest {
        GenerateRequest {
            query: "What is our PTO policy?".to_string(),
            retrieval_mode: "hybrid".to_string(),
            role: "employee".to_string(),
            rerank: true,
            top_k: 5,
        }
    }

    #[tokio::test]
    async fn test_generate_round_trip_against_stub() {
        let app = Router::new().route(
            "/generate",
            post(|Json(req): Json<GenerateRequest>| async move {
                assert_eq!(req.retrieval_mode, "hybrid");
                assert_eq!(req.role, "employee");
                Json(sample_response(&req.query))
            }),
        );
        let base = spawn_stub(app).await;
        let client = ApiClient::new(&base, None).unwrap();
        assert!(!client.base_url().ends_with('/'));

        let response = client.generate(&wire_request()).await.unwrap();
        assert_eq!(response.retrieved_chunks.len(), 2);
        assert_eq!(response.user_input.query, "What is our PTO policy?");
    }

    #[tokio::test]
    async fn test_generate_uses_service_detail_on_error() {
        let app = Router::new().route(
            "/generate",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "detail": "index unavailable" })),
                )
            }),
        );
        let base = spawn_stub(app).await;
        let client = ApiClient::new(&base, None).unwrap();

        let err = client.generate(&wire_request()).await.unwrap_err();
        assert_eq!(err, ExplorerError::transport(Some(500), "index unavailable"));
    }

    #[tokio::test]
    async fn test_generate_falls_back_to_status_line() {
        let app = Router::new().route(
            "/generate",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded") }),
        );
        let base = spawn_stub(app).await;
        let client = ApiClient::new(&base, None).unwrap();

        let err = client.generate(&wire_request()).await.unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_success_body() {
        let app = Router::new().route(
            "/generate",
            post(|| async { Json(serde_json::json!({ "llm_output": "only this" })) }),
        );
        let base = spawn_stub(app).await;
        let client = ApiClient::new(&base, None).unwrap();

        let err = client.generate(&wire_request()).await.unwrap_err();
        assert_eq!(err.status(), Some(200));
        assert!(err.to_string().starts_with("Invalid response body"));
    }

    #[tokio::test]
    async fn test_network_failure_has_no_status() {
        // Bind then drop to get a port nobody is listening on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{}", addr), None).unwrap();
        let err = client.check_health().await.unwrap_err();
        assert!(matches!(err, ExplorerError::Transport { status: None, .. }));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = Router::new().route(
            "/health",
            get(|| async {
                Json(serde_json::json!({
                    "status": "healthy",
                    "message": "Retrievus API is running"
                }))
            }),
        );
        let base = spawn_stub(app).await;
        let client = ApiClient::new(&base, None).unwrap();

        let health = client.check_health().await.unwrap();
        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn test_health_check_non_success_is_error() {
        let app = Router::new().route(
            "/health",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base = spawn_stub(app).await;
        let client = ApiClient::new(&base, None).unwrap();

        let err = client.check_health().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }
}
