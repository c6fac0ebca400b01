//! Errors raised by the service clients.

use stackquota_core::{CoreError, ServiceKind};
use stackquota_fetch::FetchError;
use thiserror::Error;

/// Errors from talking to Nova, Cinder, or Neutron.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request itself failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The service is not in the catalog.
    #[error("{0} has no endpoint in the service catalog")]
    NoEndpoint(ServiceKind),

    /// The response did not have the expected shape.
    #[error("Unexpected {service} response: {message}")]
    Parse {
        /// Service that answered.
        service: ServiceKind,
        /// What was wrong.
        message: String,
    },
}

impl ServiceError {
    pub(crate) fn parse(service: ServiceKind, message: impl Into<String>) -> Self {
        ServiceError::Parse {
            service,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for CoreError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Fetch(e) => e.into(),
            ServiceError::NoEndpoint(_) => CoreError::InvalidConfig(err.to_string()),
            ServiceError::Parse { .. } => CoreError::InvalidData(err.to_string()),
        }
    }
}
