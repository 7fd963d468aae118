//! Reqwest implementation of the raw HTTP fetcher.

use std::time::Duration;

use async_trait::async_trait;
use http::header::{ACCEPT, HeaderMap};
use http::StatusCode;

use crate::github::error::GatherError;
use crate::github::locator::ApiToken;

use super::HttpFetcher;
use super::error_mapping::{is_retryable, map_http_error, map_reqwest_error};
use super::http_utils::extract_github_message;

const GITHUB_JSON: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("ghgather/", env!("CARGO_PKG_VERSION"));

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Deadline and retry policy applied to every fetch.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ghgather::github::FetchSettings;
///
/// let settings = FetchSettings::default()
///     .with_request_timeout(Duration::from_secs(5))
///     .with_max_retries(0);
/// assert_eq!(settings.max_retries(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    request_timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl FetchSettings {
    /// Sets the per-request deadline.
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Sets how many times a transport failure is retried.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base delay between retries; attempt `n` waits `n` times this.
    #[must_use]
    pub const fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Retries allowed after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Base delay between retries.
    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        self.retry_backoff
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

/// Raw outcome of one GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl FetchResponse {
    /// Assembles a response.
    #[must_use]
    pub fn new(url: impl Into<String>, status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            status,
            headers,
            body,
        }
    }

    /// URL that was requested.
    #[must_use]
    pub const fn url(&self) -> &str {
        self.url.as_str()
    }

    /// HTTP status returned by the API.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    #[must_use]
    pub const fn body(&self) -> &[u8] {
        self.body.as_slice()
    }

    /// Keeps the response only when its status is a success.
    ///
    /// # Errors
    ///
    /// Returns `GatherError::Status` carrying the GitHub error message when
    /// the status is not 2xx.
    pub fn into_success(self) -> Result<Self, GatherError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(map_http_error(
                &self.url,
                self.status,
                extract_github_message(&self.body),
            ))
        }
    }
}

/// Reqwest-backed fetcher with a deadline and bounded retries.
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    /// Builds a fetcher using `settings`.
    ///
    /// # Errors
    ///
    /// Returns `GatherError::Configuration` when the HTTP client cannot be
    /// constructed.
    pub fn new(settings: FetchSettings) -> Result<Self, GatherError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| GatherError::Configuration {
                message: format!("build HTTP client failed: {error}"),
            })?;

        Ok(Self { client, settings })
    }

    async fn send_once(&self, url: &str, token: &ApiToken) -> Result<FetchResponse, reqwest::Error> {
        let mut request = self.client.get(url).header(ACCEPT, GITHUB_JSON);
        if let Some(bearer) = token.bearer() {
            request = request.bearer_auth(bearer);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(FetchResponse::new(url, status, headers, body.to_vec()))
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, token: &ApiToken) -> Result<FetchResponse, GatherError> {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            tracing::debug!("GET {url} (attempt {attempt})");

            match self.send_once(url, token).await {
                Ok(response) => return Ok(response),
                Err(error) if is_retryable(&error) && attempt <= self.settings.max_retries() => {
                    let delay = self.settings.retry_backoff().saturating_mul(attempt);
                    tracing::warn!("GET {url} failed, retrying in {delay:?}: {error}");
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(map_reqwest_error(url, &error)),
            }
        }
    }
}
