//! Search session state store
//!
//! Owns the `SessionState` and is the only place it changes. Every intent
//! takes the write lock for the duration of its own mutation; `submit` drops
//! it across the network exchange so other intents stay responsive while a
//! search is in flight.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{ExplorerError, ExplorerResult};
use crate::models::{Connectivity, SearchRequest, SearchResult, SessionState};
use crate::services::result_transformer::transform_response;
use crate::services::RetrievalService;

#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    service: Arc<dyn RetrievalService>,
}

impl SessionStore {
    pub fn new(service: Arc<dyn RetrievalService>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            service,
        }
    }

    /// Reset the session and start a background health probe.
    ///
    /// Refused with `Busy` while a search is in flight, so a result from the
    /// previous session can never land in the new one. The probe only ever
    /// touches `connectivity`, and only for the session that started it.
    pub async fn initialize(&self) -> ExplorerResult<JoinHandle<()>> {
        let generation = {
            let mut state = self.state.write().await;
            if state.is_loading {
                debug!("Rejecting session reset while a search is in flight");
                return Err(ExplorerError::Busy);
            }
            let generation = state.generation + 1;
            *state = SessionState {
                generation,
                ..SessionState::default()
            };
            generation
        };

        let store = self.clone();
        Ok(tokio::spawn(async move {
            store.probe_health(generation).await;
        }))
    }

    async fn probe_health(&self, generation: u64) {
        let connectivity = match self.service.check_health().await {
            Ok(health) => {
                info!("Retrieval service is {}: {}", health.status, health.message);
                Connectivity::Healthy
            }
            Err(e) => {
                warn!("Retrieval service health check failed: {}", e);
                Connectivity::Unreachable
            }
        };

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(generation, "Discarding health probe from a previous session");
            return;
        }
        state.connectivity = connectivity;
    }

    /// Run one search. A second submit while one is outstanding is rejected
    /// with `Busy` so results are never inserted out of submission order.
    pub async fn submit(&self, request: SearchRequest) -> ExplorerResult<Arc<SearchResult>> {
        request.validate()?;

        {
            let mut state = self.state.write().await;
            if state.is_loading {
                debug!("Rejecting submit while another search is in flight");
                return Err(ExplorerError::Busy);
            }
            state.is_loading = true;
            state.last_error = None;
        }

        info!(
            mode = request.mode.as_str(),
            role = request.role.as_str(),
            rerank = request.rerank,
            top_k = request.top_k,
            "Submitting search: {}",
            request.query
        );
        let outcome = self.service.generate(&request.to_wire()).await;

        let mut state = self.state.write().await;
        state.is_loading = false;

        match outcome {
            Ok(response) => {
                let result = Arc::new(transform_response(&response, &request));
                state.active_results.insert(0, Arc::clone(&result));
                state.history.insert(0, Arc::clone(&result));
                info!(
                    result_id = %result.id,
                    chunks = result.chunks.len(),
                    "Search completed"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(status = ?e.status(), "Search failed: {}", e);
                state.last_error = Some(format!("Search failed: {}", e));
                Err(e)
            }
        }
    }

    pub async fn dismiss_error(&self) {
        self.state.write().await.last_error = None;
    }

    /// Bring a history entry back to the top of the active results and close
    /// the history view. History itself is never reordered.
    pub async fn replay(&self, result_id: &str) -> ExplorerResult<Arc<SearchResult>> {
        let mut state = self.state.write().await;

        let result = state
            .find_in_history(result_id)
            .cloned()
            .ok_or_else(|| ExplorerError::NotFound(result_id.to_string()))?;

        state.active_results.retain(|r| r.id != result_id);
        state.active_results.insert(0, Arc::clone(&result));
        state.history_open = false;

        debug!(result_id, "Replayed result from history");
        Ok(result)
    }

    pub async fn open_history(&self) {
        self.state.write().await.history_open = true;
    }

    pub async fn close_history(&self) {
        self.state.write().await.history_open = false;
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }
}
