//! Shared fixtures for service tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{ExplorerError, ExplorerResult};
use crate::models::{GenerateRequest, GenerateResponse, HealthStatus, RetrievedChunk, UserInput};
use crate::services::RetrievalService;

pub fn sample_response(query: &str) -> GenerateResponse {
    GenerateResponse {
        user_input: UserInput {
            query: query.to_string(),
            retrieval_mode: "hybrid".to_string(),
            role: "employee".to_string(),
            rerank: true,
            top_k: 5,
        },
        retrieved_chunks: vec![
            RetrievedChunk {
                id: "hr-handbook-12".to_string(),
                text: "Employees accrue 1.5 days of PTO per month.".to_string(),
                role: "employee".to_string(),
                score: 0.9123,
            },
            RetrievedChunk {
                id: "hr-faq-3".to_string(),
                text: "Unused PTO rolls over up to 5 days.".to_string(),
                role: "employee".to_string(),
                score: 0.7741,
            },
        ],
        llm_output: "You accrue 1.5 PTO days monthly; up to 5 roll over.".to_string(),
    }
}

/// Retrieval service double that replays scripted outcomes in order.
///
/// When gated, `generate` waits for `release()` before answering.
#[derive(Default)]
pub struct ScriptedService {
    outcomes: Mutex<VecDeque<ExplorerResult<GenerateResponse>>>,
    health: Mutex<Option<ExplorerResult<HealthStatus>>>,
    held_health: Mutex<VecDeque<(ExplorerResult<HealthStatus>, Arc<Notify>)>>,
    health_calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
    generate_calls: AtomicUsize,
    gate: Option<Notify>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn push(self, outcome: ExplorerResult<GenerateResponse>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_health(self, health: ExplorerResult<HealthStatus>) -> Self {
        *self.health.lock().unwrap() = Some(health);
        self
    }

    /// Queue a health outcome that is only returned once `hold` is notified
    pub fn push_held_health(self, health: ExplorerResult<HealthStatus>, hold: Arc<Notify>) -> Self {
        self.held_health.lock().unwrap().push_back((health, hold));
        self
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetrievalService for ScriptedService {
    async fn generate(&self, request: &GenerateRequest) -> ExplorerResult<GenerateResponse> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(sample_response(&request.query)))
    }

    async fn check_health(&self) -> ExplorerResult<HealthStatus> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);

        let held = self.held_health.lock().unwrap().pop_front();
        if let Some((outcome, hold)) = held {
            hold.notified().await;
            return outcome;
        }

        self.health.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(HealthStatus {
                status: "healthy".to_string(),
                message: "ok".to_string(),
            })
        })
    }
}

pub fn service_down() -> ExplorerError {
    ExplorerError::transport(None, "error sending request: connection refused")
}
