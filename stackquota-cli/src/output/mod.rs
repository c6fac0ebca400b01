//! Output formatting for CLI.

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use stackquota_services::ServiceDescriptor;

/// One backend service as shown by the `services` command.
#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub descriptor: &'static ServiceDescriptor,
    pub enabled: bool,
    pub endpoint: Option<String>,
}

#[cfg(test)]
mod tests;
