//! Configuration module for the knowledge explorer client

use std::env;
use std::time::Duration;

use crate::models::{RetrievalMode, Role, DEFAULT_TOP_K};

#[derive(Debug, Clone)]
pub struct Config {
    // Retrieval service
    pub api_base_url: String,
    pub request_timeout: Option<Duration>,

    // Search form defaults
    pub default_mode: RetrievalMode,
    pub default_role: Role,
    pub default_rerank: bool,
    pub default_top_k: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_base_url: var("API_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            request_timeout: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),

            default_mode: var("DEFAULT_RETRIEVAL_MODE")
                .and_then(|v| RetrievalMode::from_str(&v))
                .unwrap_or(RetrievalMode::Hybrid),
            default_role: var("DEFAULT_ROLE")
                .and_then(|v| Role::from_str(&v))
                .unwrap_or(Role::Employee),
            default_rerank: var("DEFAULT_RERANK")
                .unwrap_or_else(|| "true".to_string())
                .parse()
                .unwrap_or(true),
            default_top_k: var("DEFAULT_TOP_K")
                .unwrap_or_else(|| DEFAULT_TOP_K.to_string())
                .parse::<u32>()
                .ok()
                .filter(|k| *k >= 1)
                .unwrap_or(DEFAULT_TOP_K),
        }
    }
}
