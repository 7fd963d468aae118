//! Gateways for talking to the GitHub API.
//!
//! This module provides trait-based gateways for the two kinds of network
//! access a gather cycle needs: raw authenticated GETs against arbitrary
//! target URLs, and the paginated pull request walk. The trait-based design
//! enables mocking in tests while the Reqwest and Octocrab implementations
//! handle real HTTP requests.

mod client;
mod error_mapping;
mod fetcher;
mod http_utils;
mod pull_request;

pub use fetcher::{FetchResponse, FetchSettings, ReqwestFetcher};
pub use pull_request::OctocrabPullRequestGateway;

pub(crate) use http_utils::header_to_string;

use async_trait::async_trait;

use crate::github::error::GatherError;
use crate::github::locator::{ApiToken, RepositoryLocator};
use crate::github::models::PullRequest;

/// Issues one authenticated GET and returns status, headers, and body.
///
/// Implementations pass status codes through untouched; deciding what a
/// status means is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Fetch `url`, sending `token` as a bearer credential when present.
    async fn fetch(&self, url: &str, token: &ApiToken) -> Result<FetchResponse, GatherError>;
}

/// Gateway that lists every pull request of a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Walk all pages of the repository's pull requests.
    ///
    /// Any page failure fails the whole listing.
    async fn list_all(
        &self,
        locator: &RepositoryLocator,
        token: &ApiToken,
    ) -> Result<Vec<PullRequest>, GatherError>;
}
