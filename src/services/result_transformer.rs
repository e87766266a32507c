//! Builds session result records from service responses

use chrono::Utc;
use uuid::Uuid;

use crate::models::{DisplayChunk, GenerateResponse, RetrievedChunk, SearchRequest, SearchResult};

/// Project a service response and the request that produced it into a
/// `SearchResult`. Only the id and timestamp vary between calls.
pub fn transform_response(response: &GenerateResponse, request: &SearchRequest) -> SearchResult {
    SearchResult {
        id: new_result_id(),
        query: request.query.clone(),
        mode: request.mode,
        role: request.role,
        rerank: request.rerank,
        timestamp: Utc::now(),
        chunks: response.retrieved_chunks.iter().map(to_display_chunk).collect(),
        answer_text: response.llm_output.clone(),
        raw_response: response.clone(),
    }
}

/// `result-<unix millis>-<random suffix>`
fn new_result_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("result-{}-{}", Utc::now().timestamp_millis(), &suffix[..9])
}

fn to_display_chunk(chunk: &RetrievedChunk) -> DisplayChunk {
    DisplayChunk {
        id: chunk.id.clone(),
        content: chunk.text.clone(),
        source: source_label(&chunk.id),
        score: chunk.score,
    }
}

pub fn source_label(chunk_id: &str) -> String {
    format!("Document: {}", chunk_id)
}
