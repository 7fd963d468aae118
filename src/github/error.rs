//! Error types exposed by the gathering layer.

use thiserror::Error;

/// Errors surfaced while fetching, decoding, or configuring a gather cycle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatherError {
    /// A network or connection failure occurred during a GET.
    #[error("network error fetching {url}: {message}")]
    Transport {
        /// URL that was being requested.
        url: String,
        /// Transport-level error detail.
        message: String,
    },

    /// The API answered with a non-success HTTP status.
    #[error("{url} returned status {status}: {message}")]
    Status {
        /// URL that was requested.
        url: String,
        /// Numeric HTTP status code.
        status: u16,
        /// Message extracted from the response body, when present.
        message: String,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("could not decode response from {url}: {message}")]
    Decode {
        /// URL whose response failed to decode.
        url: String,
        /// Decoder error detail.
        message: String,
    },

    /// The rate-limit resource does not exist on this API deployment.
    #[error("rate limiting is not enabled on this GitHub API")]
    RateLimitDisabled,

    /// A rate-limit header was missing or not numeric.
    #[error("rate limit header {header} is invalid: {message}")]
    HeaderParse {
        /// Name of the offending header.
        header: String,
        /// Why the header could not be parsed.
        message: String,
    },

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
