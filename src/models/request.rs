//! Search request models and the retrieval vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ExplorerError, ExplorerResult};

/// Retrieval strategy used by the service to fetch candidate chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetrievalMode {
    Dense,
    Sparse,
    Hybrid,
}

impl RetrievalMode {
    pub const ALL: [RetrievalMode; 3] = [
        RetrievalMode::Dense,
        RetrievalMode::Sparse,
        RetrievalMode::Hybrid,
    ];

    /// Wire value understood by the service
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalMode::Dense => "dense",
            RetrievalMode::Sparse => "sparse",
            RetrievalMode::Hybrid => "hybrid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RetrievalMode::Dense => "Dense",
            RetrievalMode::Sparse => "Sparse",
            RetrievalMode::Hybrid => "Hybrid",
        }
    }

    /// Accepts any casing of the three mode names
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" => Some(RetrievalMode::Dense),
            "sparse" => Some(RetrievalMode::Sparse),
            "hybrid" => Some(RetrievalMode::Hybrid),
            _ => None,
        }
    }
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role used by the service for access filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Intern,
    Employee,
    Manager,
    Executive,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Intern, Role::Employee, Role::Manager, Role::Executive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Intern => "intern",
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Executive => "executive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Intern => "Intern",
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::Executive => "Executive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intern" => Some(Role::Intern),
            "employee" => Some(Role::Employee),
            "manager" => Some(Role::Manager),
            "executive" => Some(Role::Executive),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const DEFAULT_TOP_K: u32 = 5;

/// A search as submitted by the user
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub mode: RetrievalMode,
    pub role: Role,
    pub rerank: bool,
    pub top_k: u32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, mode: RetrievalMode, role: Role, rerank: bool) -> Self {
        Self {
            query: query.into(),
            mode,
            role,
            rerank,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Checks the preconditions that must hold before anything is sent
    pub fn validate(&self) -> ExplorerResult<()> {
        if self.query.trim().is_empty() {
            return Err(ExplorerError::Validation("query must not be empty".to_string()));
        }
        if self.top_k < 1 {
            return Err(ExplorerError::Validation("top_k must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn to_wire(&self) -> GenerateRequest {
        GenerateRequest {
            query: self.query.clone(),
            retrieval_mode: self.mode.as_str().to_string(),
            role: self.role.as_str().to_string(),
            rerank: self.rerank,
            top_k: self.top_k,
        }
    }
}

/// Body of `POST /generate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    pub query: String,
    pub retrieval_mode: String,
    pub role: String,
    pub rerank: bool,
    pub top_k: u32,
}
