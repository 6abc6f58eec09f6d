//! Pxshot HTTP client implementation.

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Method, Response, Url};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

use crate::error::{PxshotError, Result};
use crate::rate_limit::RateLimitInfo;
use crate::types::{ScreenshotOutput, ScreenshotRequest, ScreenshotResult, UsageResult};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.pxshot.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// SDK version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const USER_AGENT_VALUE: &str = concat!("pxshot-rust/", env!("CARGO_PKG_VERSION"));

/// Pxshot API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct PxshotClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl fmt::Debug for PxshotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PxshotClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PxshotClient {
    /// Create a new client with default options.
    ///
    /// # Errors
    ///
    /// Returns [`PxshotError::Configuration`] if the API key is empty, the
    /// base URL does not parse, or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`PxshotError::Configuration`] if the API key is empty, the
    /// base URL does not parse, or the HTTP client cannot be built.
    pub fn with_options(api_key: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(PxshotError::Configuration(
                "API key is required".to_string(),
            ));
        }

        let base_url = options.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            PxshotError::Configuration(format!("invalid base URL {base_url:?}: {e}"))
        })?;

        let timeout = Duration::from_secs(options.timeout_seconds);
        let client = match options.http_client {
            Some(client) => client,
            None => Client::builder().timeout(timeout).build().map_err(|e| {
                PxshotError::Configuration(format!("failed to build HTTP client: {e}"))
            })?,
        };

        Ok(Self {
            client,
            base_url,
            api_key,
            timeout,
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// SDK version.
    #[must_use]
    pub fn version() -> &'static str {
        VERSION
    }

    /// Capture a screenshot.
    ///
    /// Returns the image bytes, or a hosted asset descriptor when the
    /// request sets `store`.
    ///
    /// # Errors
    ///
    /// Returns [`PxshotError::Validation`] without sending anything if the
    /// URL is empty, a mapped error for non-success responses, and
    /// [`PxshotError::Transport`] if the request fails.
    pub async fn screenshot(&self, request: &ScreenshotRequest) -> Result<ScreenshotOutput> {
        if request.url.is_empty() {
            return Err(PxshotError::missing_field("url"));
        }

        let response = self
            .send(self.request(Method::POST, "/v1/screenshot").json(request))
            .await?;
        let rate_limit = RateLimitInfo::from_headers(response.headers());

        if request.is_stored() {
            let mut result: ScreenshotResult = response.json().await?;
            result.rate_limit = rate_limit;
            return Ok(ScreenshotOutput::Stored(result));
        }

        Ok(ScreenshotOutput::Image(response.bytes().await?.to_vec()))
    }

    /// Get usage statistics for the account.
    ///
    /// # Errors
    ///
    /// Returns a mapped error for non-success responses and
    /// [`PxshotError::Transport`] if the request fails or the body is not a
    /// JSON object.
    pub async fn usage(&self) -> Result<UsageResult> {
        let response = self.send(self.request(Method::GET, "/v1/usage")).await?;
        let rate_limit = RateLimitInfo::from_headers(response.headers());
        let data: Map<String, Value> = response.json().await?;

        Ok(UsageResult::new(data, rate_limit))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);

        self.client
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .timeout(self.timeout)
    }

    /// Send a request and convert error responses.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        tracing::debug!(%method, %path, "Sending Pxshot request");

        let response = self.client.execute(request).await?;
        let status = response.status();

        if status.is_success() {
            tracing::debug!(
                %method,
                %path,
                status = status.as_u16(),
                "Pxshot request succeeded"
            );
            return Ok(response);
        }

        let headers = response.headers().clone();
        // An unreadable error body still yields a status-driven error.
        let body = response.bytes().await.unwrap_or_default();
        let error = PxshotError::from_response(status, &headers, &body);

        tracing::warn!(
            %method,
            %path,
            status = status.as_u16(),
            error = %error,
            "Pxshot request failed"
        );

        Err(error)
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API base URL (default: `https://api.pxshot.com`).
    pub base_url: String,
    /// Request timeout in seconds (default: 60).
    pub timeout_seconds: u64,
    /// HTTP client to send requests with instead of a freshly built one.
    pub http_client: Option<Client>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            http_client: None,
        }
    }
}

impl ClientOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Send requests through an existing HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = PxshotClient::new("px_test_key").unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = PxshotClient::new("").unwrap_err();
        assert!(matches!(err, PxshotError::Configuration(_)));
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        for base_url in ["not a url", "", "/v1"] {
            let options = ClientOptions::new().with_base_url(base_url);
            let err = PxshotClient::with_options("px_test_key", options).unwrap_err();
            assert!(
                matches!(err, PxshotError::Configuration(_)),
                "{base_url:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn client_trims_trailing_slash() {
        let options = ClientOptions::new().with_base_url("http://localhost:8080/");
        let client = PxshotClient::with_options("px_test_key", options).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn client_options() {
        let options = ClientOptions::new()
            .with_timeout_seconds(5)
            .with_http_client(Client::new());
        let client = PxshotClient::with_options("px_test_key", options).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn debug_hides_api_key() {
        let client = PxshotClient::new("px_secret").unwrap();
        assert!(!format!("{client:?}").contains("px_secret"));
    }

    #[test]
    fn version_is_semver() {
        let parts: Vec<&str> = PxshotClient::version().split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())));
    }
}
