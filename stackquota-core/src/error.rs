//! Core error types for `StackQuota`.

use thiserror::Error;

/// Core error type shared by the aggregator and every backend collaborator.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The backend service could not be reached or answered with a server error.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The requested tenant or resource does not exist on the backend.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected our credentials or token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid data from a backend response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Any other failure reported by a backend client.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns true if the error is likely to go away on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::ServiceUnavailable(_))
    }
}
