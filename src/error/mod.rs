//! Error types for the hub adapter.
//!
//! Two layers: [`HubError`] is the Rust error that propagates with `?`
//! (network failures, bad arguments, identity lookup), while [`ErrorResult`]
//! is the data record handed back to the agent. Upstream non-success statuses
//! never become a `HubError`; the transport turns them into an `ErrorResult`
//! directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `error_code` used when a failure carries no HTTP status.
pub const NO_STATUS: u16 = 0;

/// Primary error type for all hub operations.
#[derive(Error, Debug)]
pub enum HubError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("must input CSGHUB_ACCESS_TOKEN.")]
    MissingToken,

    #[error("Failed to get username. {0}")]
    Identity(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl HubError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Render into the uniform error record returned to the agent.
    pub fn to_error_result(&self) -> ErrorResult {
        match self {
            Self::Api { status, message } => ErrorResult::new(*status, message.clone()),
            other => ErrorResult::new(other.status().unwrap_or(NO_STATUS), format!("Error: {other}")),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, HubError>;

/// The uniform two-field failure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error_code: u16,
    pub error_message: String,
}

impl ErrorResult {
    pub fn new(error_code: u16, error_message: impl Into<String>) -> Self {
        Self {
            error_code,
            error_message: error_message.into(),
        }
    }
}
