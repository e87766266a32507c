//! Wire models returned by the retrieval service

use serde::{Deserialize, Serialize};

/// A scored unit of retrieved text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    pub id: String,
    pub text: String,
    pub role: String,
    pub score: f64,
}

/// Echo of the request as the service understood it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInput {
    pub query: String,
    pub retrieval_mode: String,
    pub role: String,
    pub rerank: bool,
    pub top_k: u32,
}

/// Body of a successful `POST /generate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub user_input: UserInput,
    pub retrieved_chunks: Vec<RetrievedChunk>,
    pub llm_output: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// Structured error body sent with non-success responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ApiErrorBody {
    /// Human-readable detail. Validation failures arrive as a list and are
    /// rendered as compact JSON.
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
