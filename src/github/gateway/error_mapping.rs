//! Error mapping helpers for the gateway implementations.

use http::StatusCode;

use crate::github::error::GatherError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a Reqwest failure is worth another attempt.
///
/// Only failures before a response arrived qualify; HTTP statuses are never
/// retried.
pub(super) fn is_retryable(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}

pub(super) fn map_octocrab_error(operation: &str, url: &str, error: &octocrab::Error) -> GatherError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return if is_auth_failure(source.status_code) {
            GatherError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else {
            GatherError::Api {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return GatherError::Transport {
            url: url.to_owned(),
            message: format!("{operation} failed: {error}"),
        };
    }

    GatherError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_reqwest_error(url: &str, error: &reqwest::Error) -> GatherError {
    if error.is_builder() {
        return GatherError::InvalidUrl(format!("{url}: {error}"));
    }

    GatherError::Transport {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

pub(super) fn map_http_error(
    url: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> GatherError {
    let message = maybe_message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned()
    });
    GatherError::Status {
        url: url.to_owned(),
        status: status.as_u16(),
        message,
    }
}
