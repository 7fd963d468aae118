//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use url::Url;

use crate::github::error::GatherError;
use crate::github::locator::ApiToken;

use super::FetchSettings;
use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// Anonymous tokens produce an unauthenticated client. The request timeout
/// from `settings` bounds connecting, reading, and writing, and
/// `max_retries` caps Octocrab's own retries.
///
/// # Errors
///
/// Returns `GatherError::InvalidUrl` when the base URI cannot be parsed or
/// `GatherError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &ApiToken,
    api_base: &Url,
    settings: &FetchSettings,
) -> Result<Octocrab, GatherError> {
    let base_uri: Uri = api_base
        .as_str()
        .parse::<Uri>()
        .map_err(|error| GatherError::InvalidUrl(error.to_string()))?;

    let mut builder = Octocrab::builder()
        .base_uri(base_uri)
        .map_err(|error| GatherError::Api {
            message: format!("build client failed: {error}"),
        })?
        .set_connect_timeout(Some(settings.request_timeout()))
        .set_read_timeout(Some(settings.request_timeout()))
        .set_write_timeout(Some(settings.request_timeout()))
        .add_retry_config(retry_config(settings.max_retries()));

    if let Some(bearer) = token.bearer() {
        builder = builder.personal_token(bearer.to_owned());
    }

    builder
        .build()
        .map_err(|error| map_octocrab_error("build client", api_base.as_str(), &error))
}

fn retry_config(max_retries: u32) -> RetryConfig {
    match usize::try_from(max_retries) {
        Ok(0) => RetryConfig::None,
        Ok(retries) => RetryConfig::Simple(retries),
        Err(_) => RetryConfig::Simple(usize::MAX),
    }
}
