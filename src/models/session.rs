//! Session state model

use std::sync::Arc;

use super::SearchResult;

/// Reachability of the retrieval service as last observed by the health probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    #[default]
    Unknown,
    Healthy,
    Unreachable,
}

/// Everything the presentation layer can observe about a session.
///
/// Results are reference counted so `active_results` and `history` point at
/// the same records; cloning a snapshot never copies a result.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Most recent first
    pub active_results: Vec<Arc<SearchResult>>,
    /// Most recent submission first
    pub history: Vec<Arc<SearchResult>>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub connectivity: Connectivity,
    pub history_open: bool,
    /// Bumped on every `initialize`; late work from an earlier session
    /// compares against it before writing back
    pub generation: u64,
}

impl SessionState {
    pub fn find_in_history(&self, result_id: &str) -> Option<&Arc<SearchResult>> {
        self.history.iter().find(|r| r.id == result_id)
    }
}
