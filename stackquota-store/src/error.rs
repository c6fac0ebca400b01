//! Store error types.

use stackquota_fetch::FetchError;
use thiserror::Error;

/// Errors that can occur while loading configuration or credentials.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required setting is absent from both the file and the environment.
    #[error("Missing setting `{setting}` (set it in the config file or {env_var})")]
    MissingSetting {
        /// Config file key.
        setting: &'static str,
        /// Environment variable that can supply it.
        env_var: &'static str,
    },

    /// Keychain access failed.
    #[error("Keychain error: {0}")]
    Keychain(String),

    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] FetchError),
}

impl StoreError {
    /// Returns true if this error is due to missing user input rather than
    /// a broken environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::Config(_) | StoreError::MissingSetting { .. }
        )
    }
}
