//! Error types for the knowledge explorer client

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExplorerError {
    /// Network failure or a non-success response from the retrieval service.
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Result not found in history: {0}")]
    NotFound(String),

    #[error("A search is already in progress")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;

impl ExplorerError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        ExplorerError::Transport {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by a transport failure, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ExplorerError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        ExplorerError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
