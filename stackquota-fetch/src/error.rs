//! Fetch error types.

use stackquota_core::CoreError;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for HTTP and authentication operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limited by the service.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after: Option<u64>,
    },

    /// Authentication failed or the token was rejected.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service answered with a 5xx status.
    #[error("Server error {status}: {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Invalid response from the service.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No endpoint in the service catalog matches.
    #[error("No endpoint found for service type {0}")]
    EndpointNotFound(String),

    /// A URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl FetchError {
    /// Returns true if the same request may succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(e) => e.is_connect() || e.is_timeout(),
            FetchError::Timeout(_) | FetchError::RateLimited { .. } => true,
            FetchError::ServerError { status, .. } => *status == 503,
            _ => false,
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

impl From<FetchError> for CoreError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Core(inner) => inner,
            FetchError::AuthenticationFailed(msg) => CoreError::Unauthorized(msg),
            FetchError::NotFound(msg) => CoreError::NotFound(msg),
            FetchError::Json(e) => CoreError::Serialization(e),
            FetchError::InvalidResponse(msg) => CoreError::InvalidData(msg),
            FetchError::EndpointNotFound(_) | FetchError::InvalidUrl(_) => {
                CoreError::InvalidConfig(err.to_string())
            }
            FetchError::Http(_)
            | FetchError::Timeout(_)
            | FetchError::RateLimited { .. }
            | FetchError::ServerError { .. } => CoreError::ServiceUnavailable(err.to_string()),
        }
    }
}
