//! Rate limit probing against the GitHub API.
//!
//! The probe reads GitHub's rate limit headers (`X-RateLimit-Limit`,
//! `X-RateLimit-Remaining`, `X-RateLimit-Reset`) from a request to the
//! `rate_limit` resource. It is independent of the gather cycle and is most
//! useful when polling anonymously under the lower quota.

use http::StatusCode;
use http::header::HeaderMap;
use serde::Serialize;
use url::Url;

use super::error::GatherError;
use super::gateway::{HttpFetcher, header_to_string};
use super::locator::ApiToken;

/// Header carrying the request quota for the current window.
pub const LIMIT_HEADER: &str = "X-RateLimit-Limit";
/// Header carrying the requests left in the current window.
pub const REMAINING_HEADER: &str = "X-RateLimit-Remaining";
/// Header carrying the window reset time in epoch seconds.
pub const RESET_HEADER: &str = "X-RateLimit-Reset";

/// Snapshot of the API's quota accounting.
///
/// The default value is all zeroes and is what callers should report when a
/// probe fails.
///
/// # Example
///
/// ```
/// use ghgather::github::rate_limit::RateLimits;
///
/// let limits = RateLimits::new(60.0, 0.0, 1_700_000_000.0);
/// assert!(limits.is_exhausted());
/// assert_eq!(RateLimits::default().limit(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RateLimits {
    limit: f64,
    remaining: f64,
    reset: f64,
}

impl RateLimits {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(limit: f64, remaining: f64, reset: f64) -> Self {
        Self {
            limit,
            remaining,
            reset,
        }
    }

    /// Maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> f64 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Epoch seconds at which the window resets.
    #[must_use]
    pub const fn reset(&self) -> f64 {
        self.reset
    }

    /// Returns true if no requests remain in the current window.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0.0
    }

    fn from_headers(headers: &HeaderMap) -> Result<Self, GatherError> {
        Ok(Self {
            limit: parse_header(headers, LIMIT_HEADER)?,
            remaining: parse_header(headers, REMAINING_HEADER)?,
            reset: parse_header(headers, RESET_HEADER)?,
        })
    }
}

fn parse_header(headers: &HeaderMap, name: &str) -> Result<f64, GatherError> {
    let raw = header_to_string(headers.get(name)).ok_or_else(|| GatherError::HeaderParse {
        header: name.to_owned(),
        message: "header is missing".to_owned(),
    })?;

    raw.trim()
        .parse::<f64>()
        .map_err(|error| GatherError::HeaderParse {
            header: name.to_owned(),
            message: format!("{raw:?} is not a number: {error}"),
        })
}

/// Builds `<base>/rate_limit`, keeping any API path prefix.
///
/// # Errors
///
/// Returns `GatherError::InvalidUrl` when `base_url` cannot be parsed.
pub fn rate_limit_url(base_url: &str) -> Result<Url, GatherError> {
    let mut url =
        Url::parse(base_url).map_err(|error| GatherError::InvalidUrl(error.to_string()))?;
    let joined = format!("{}/rate_limit", url.path().trim_end_matches('/'));
    url.set_path(&joined);
    Ok(url)
}

/// Reads the rate limit status through an [`HttpFetcher`].
pub struct RateLimitProbe<'client, Fetcher>
where
    Fetcher: HttpFetcher,
{
    fetcher: &'client Fetcher,
}

impl<'client, Fetcher> RateLimitProbe<'client, Fetcher>
where
    Fetcher: HttpFetcher,
{
    /// Create a probe using the provided fetcher.
    #[must_use]
    pub const fn new(fetcher: &'client Fetcher) -> Self {
        Self { fetcher }
    }

    /// Probe the rate limit status of the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `GatherError::RateLimitDisabled` when the resource answers 404,
    /// as GitHub Enterprise does with rate limiting switched off, and
    /// `GatherError::HeaderParse` when a header is missing or not numeric.
    /// Transport failures are propagated. Use
    /// `unwrap_or_default` to fall back to a zeroed snapshot.
    pub async fn probe(&self, base_url: &str, token: &ApiToken) -> Result<RateLimits, GatherError> {
        let url = rate_limit_url(base_url)?;
        let response = self.fetcher.fetch(url.as_str(), token).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatherError::RateLimitDisabled);
        }

        RateLimits::from_headers(response.headers())
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use http::header::{HeaderMap, HeaderValue};
    use rstest::rstest;

    use super::{RateLimitProbe, RateLimits, rate_limit_url};
    use crate::github::error::GatherError;
    use crate::github::gateway::{FetchResponse, MockHttpFetcher};
    use crate::github::locator::ApiToken;

    fn headers(limit: &'static str, remaining: &'static str, reset: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert("x-ratelimit-limit", HeaderValue::from_static(limit));
        map.insert("x-ratelimit-remaining", HeaderValue::from_static(remaining));
        map.insert("x-ratelimit-reset", HeaderValue::from_static(reset));
        map
    }

    fn fetcher_returning(status: StatusCode, header_map: HeaderMap) -> MockHttpFetcher {
        let mut fetcher = MockHttpFetcher::new();
        fetcher.expect_fetch().times(1).returning(move |url, _| {
            Ok(FetchResponse::new(url, status, header_map.clone(), Vec::new()))
        });
        fetcher
    }

    #[rstest]
    #[case::root("https://api.github.com", "https://api.github.com/rate_limit")]
    #[case::root_slash("https://api.github.com/", "https://api.github.com/rate_limit")]
    #[case::enterprise("https://ghe.test/api/v3", "https://ghe.test/api/v3/rate_limit")]
    fn rate_limit_url_joins_paths(#[case] base: &str, #[case] expected: &str) {
        let url = rate_limit_url(base).expect("base should parse");
        assert_eq!(url.as_str(), expected);
    }

    #[tokio::test]
    async fn parses_numeric_headers() {
        let fetcher = fetcher_returning(StatusCode::OK, headers("5000", "4999", "1700000000"));

        let limits = RateLimitProbe::new(&fetcher)
            .probe("https://api.github.com", &ApiToken::anonymous())
            .await
            .expect("probe should succeed");

        assert_eq!(limits, RateLimits::new(5000.0, 4999.0, 1_700_000_000.0));
        assert!(!limits.is_exhausted());
    }

    #[tokio::test]
    async fn not_found_means_rate_limiting_is_disabled() {
        let fetcher = fetcher_returning(StatusCode::NOT_FOUND, HeaderMap::new());

        let result = RateLimitProbe::new(&fetcher)
            .probe("https://ghe.test/api/v3", &ApiToken::anonymous())
            .await;

        assert_eq!(result, Err(GatherError::RateLimitDisabled));
        assert_eq!(result.unwrap_or_default(), RateLimits::default());
    }

    #[tokio::test]
    async fn non_numeric_limit_is_a_header_parse_error() {
        let fetcher = fetcher_returning(StatusCode::OK, headers("lots", "1", "2"));

        let result = RateLimitProbe::new(&fetcher)
            .probe("https://api.github.com", &ApiToken::anonymous())
            .await;

        assert!(
            matches!(&result, Err(GatherError::HeaderParse { header, .. }) if header == "X-RateLimit-Limit"),
            "expected HeaderParse for the limit header, got {result:?}"
        );
    }

    #[tokio::test]
    async fn missing_reset_is_a_header_parse_error() {
        let mut partial = HeaderMap::new();
        partial.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
        partial.insert("x-ratelimit-remaining", HeaderValue::from_static("59"));
        let fetcher = fetcher_returning(StatusCode::OK, partial);

        let result = RateLimitProbe::new(&fetcher)
            .probe("https://api.github.com", &ApiToken::anonymous())
            .await;

        assert!(
            matches!(&result, Err(GatherError::HeaderParse { header, .. }) if header == "X-RateLimit-Reset"),
            "expected HeaderParse for the reset header, got {result:?}"
        );
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let mut fetcher = MockHttpFetcher::new();
        fetcher.expect_fetch().returning(|url, _| {
            Err(GatherError::Transport {
                url: url.to_owned(),
                message: "connection refused".to_owned(),
            })
        });

        let result = RateLimitProbe::new(&fetcher)
            .probe("https://api.github.com", &ApiToken::anonymous())
            .await;

        assert!(
            matches!(result, Err(GatherError::Transport { .. })),
            "expected Transport error, got {result:?}"
        );
    }
}
