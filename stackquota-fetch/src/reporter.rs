//! [`ErrorReporter`] implementations.

use stackquota_core::{ErrorContext, ErrorReporter, ServiceKind};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Logs each reported failure as a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report_error(&self, context: &ErrorContext<'_>, user_message: &str) {
        warn!(
            service = %context.service,
            tenant = %context.tenant_id,
            error = %context.error,
            "{user_message}"
        );
    }
}

/// A failure captured by [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedError {
    /// Service whose fetch failed.
    pub service: ServiceKind,
    /// Tenant being queried.
    pub tenant_id: String,
    /// Message meant for the end user.
    pub message: String,
    /// Rendered underlying error.
    pub detail: String,
}

/// Keeps every reported failure so it can be shown after the call returns.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    reports: Mutex<Vec<ReportedError>>,
}

impl CollectingReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Failures reported so far, in order.
    pub fn reports(&self) -> Vec<ReportedError> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of failures reported so far.
    pub fn len(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ErrorReporter for CollectingReporter {
    fn report_error(&self, context: &ErrorContext<'_>, user_message: &str) {
        warn!(
            service = %context.service,
            error = %context.error,
            "{user_message}"
        );
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ReportedError {
                service: context.service,
                tenant_id: context.tenant_id.to_string(),
                message: user_message.to_string(),
                detail: context.error.to_string(),
            });
    }
}
