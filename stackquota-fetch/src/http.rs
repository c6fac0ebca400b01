//! HTTP client for OpenStack REST APIs.
//!
//! Wraps `reqwest` with:
//! - Token authentication via the `X-Auth-Token` header
//! - Retries for transient failures (see [`RetryStrategy`])
//! - Status-code mapping into [`FetchError`]
//! - Request tracing

use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;
use crate::retry::RetryStrategy;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying the token on every authenticated request.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Header carrying the issued token in an identity response.
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

const USER_AGENT: &str = concat!("stackquota/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client with retry capabilities.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    retry_strategy: RetryStrategy,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::configured(Duration::from_secs(DEFAULT_TIMEOUT_SECS), false)
    }

    /// Creates a client with a custom timeout, optionally accepting
    /// self-signed certificates.
    pub fn configured(timeout: Duration, accept_invalid_certs: bool) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            inner: client,
            retry_strategy: RetryStrategy::default(),
            timeout,
        })
    }

    /// Sets the retry strategy for this client.
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// The retry strategy in use.
    pub fn retry_strategy(&self) -> &RetryStrategy {
        &self.retry_strategy
    }

    /// GETs `url` with a token and decodes the JSON body.
    #[instrument(skip(self, token), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        token: &str,
    ) -> Result<T, FetchError> {
        let response = self
            .send_with_retry(|| {
                self.inner
                    .get(url.clone())
                    .header(AUTH_TOKEN_HEADER, token)
                    .header(header::ACCEPT, "application/json")
            })
            .await?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POSTs a JSON body without a token and returns the raw response.
    ///
    /// Used for identity requests, where the interesting part of the answer
    /// is a response header.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<Response, FetchError> {
        self.send_with_retry(|| self.inner.post(url.clone()).json(body))
            .await
    }

    async fn send_with_retry<F>(&self, build: F) -> Result<Response, FetchError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Sending request");

            match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(status = %status, "Response received");

                    if status.is_success() {
                        return Ok(response);
                    }

                    if self.retry_strategy.should_retry_status(status)
                        && self.retry_strategy.has_attempts_left(attempts)
                    {
                        let delay = self
                            .retry_strategy
                            .delay_with_hint(attempts, retry_after(&response));
                        warn!(
                            status = %status,
                            delay_ms = delay.as_millis(),
                            "Service busy, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(error_for_response(response).await);
                }
                Err(e) => {
                    if self.retry_strategy.has_attempts_left(attempts)
                        && self.retry_strategy.should_retry(&e)
                    {
                        let delay = self.retry_strategy.delay_for_attempt(attempts);
                        warn!(
                            error = %e,
                            delay_ms = delay.as_millis(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    if e.is_timeout() {
                        return Err(FetchError::Timeout(self.timeout.as_secs()));
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

async fn error_for_response(response: Response) -> FetchError {
    let status = response.status();
    let url = response.url().clone();
    let retry_after = retry_after(&response);
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::AuthenticationFailed(message)
        }
        StatusCode::NOT_FOUND => FetchError::NotFound(format!("{url}: {message}")),
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { retry_after },
        s if s.is_server_error() => FetchError::ServerError {
            status: s.as_u16(),
            message,
        },
        s => FetchError::InvalidResponse(format!("Unexpected status code {s}: {message}")),
    }
}

/// Extracts the human-readable message from an OpenStack fault body.
///
/// Services wrap it differently (`{"itemNotFound": {"message": ..}}`,
/// `{"NeutronError": {"message": ..}}`, `{"error": {"message": ..}}`), so the
/// first object member carrying a string `message` wins.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    if let Some(message) = object.get("message").and_then(|m| m.as_str()) {
        return Some(message.to_string());
    }

    object
        .values()
        .filter_map(|inner| inner.get("message").and_then(|m| m.as_str()))
        .map(str::to_string)
        .next()
}

/// Appends `path` to an endpoint URL, keeping the endpoint's own path.
///
/// `Url::join` replaces the last path segment unless the base ends with a
/// slash, and catalog endpoints such as `https://nova/v2.1/<project>` do not.
pub fn join_endpoint(base: &Url, path: &str) -> Result<Url, FetchError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_keeps_project_segment() {
        let base = Url::parse("https://nova.example.com:8774/v2.1/abc123").unwrap();
        let url = join_endpoint(&base, "/os-quota-sets/abc123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://nova.example.com:8774/v2.1/abc123/os-quota-sets/abc123"
        );
    }

    #[test]
    fn test_join_with_trailing_slash() {
        let base = Url::parse("https://neutron.example.com:9696/").unwrap();
        let url = join_endpoint(&base, "v2.0/extensions").unwrap();
        assert_eq!(url.as_str(), "https://neutron.example.com:9696/v2.0/extensions");
    }

    #[test]
    fn test_error_message_from_nova_fault() {
        let body = r#"{"itemNotFound": {"message": "Project not found", "code": 404}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Project not found"));
    }

    #[test]
    fn test_error_message_from_neutron_fault() {
        let body = r#"{"NeutronError": {"type": "HTTPForbidden", "message": "Not allowed", "detail": ""}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Not allowed"));
    }

    #[test]
    fn test_error_message_not_json() {
        assert_eq!(error_message("<html>502 Bad Gateway</html>"), None);
    }
}
