//! Error types for the crew cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Crew Error Enum ==
/// Unified error type for the cache, the kickoff hooks and the crew runner.
#[derive(Error, Debug)]
pub enum CrewError {
    /// A required input field is absent
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// An input field is present but has an unusable value
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// A persisted cache record exists but cannot be parsed
    #[error("Corrupt cache entry for key '{key}': {reason}")]
    CorruptEntry { key: String, reason: String },

    /// Cache key rejected before touching storage
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Lookup found no valid entry (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Task references an agent that was never registered
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Agent references a tool that was never registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The external executor or model runtime failed
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Storage I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking cache call was cancelled or panicked
    #[error("Blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

impl CrewError {
    /// Builds a `CorruptEntry` error for `key`.
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        CrewError::CorruptEntry {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CrewError {
    fn into_response(self) -> Response {
        let status = match &self {
            CrewError::MissingRequiredField(_)
            | CrewError::InvalidField { .. }
            | CrewError::InvalidKey(_)
            | CrewError::InvalidRequest(_)
            | CrewError::UnknownAgent(_)
            | CrewError::UnknownTool(_) => StatusCode::BAD_REQUEST,
            CrewError::NotFound(_) => StatusCode::NOT_FOUND,
            CrewError::Execution(_) => StatusCode::BAD_GATEWAY,
            CrewError::CorruptEntry { .. } | CrewError::Io(_) | CrewError::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crew cache.
pub type Result<T> = std::result::Result<T, CrewError>;
