//! Search result records held by the session

use chrono::{DateTime, Utc};

use super::{GenerateResponse, RetrievalMode, Role};

/// A retrieved chunk shaped for display
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayChunk {
    pub id: String,
    pub content: String,
    /// Human-readable label derived from the chunk id
    pub source: String,
    pub score: f64,
}

/// One completed search. Immutable once built; the session shares it
/// between the active results and the history.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub id: String,
    pub query: String,
    pub mode: RetrievalMode,
    pub role: Role,
    pub rerank: bool,
    pub timestamp: DateTime<Utc>,
    pub chunks: Vec<DisplayChunk>,
    pub answer_text: String,
    pub raw_response: GenerateResponse,
}
