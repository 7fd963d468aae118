//! GitHub data gathering.
//!
//! This module polls a set of GitHub API targets concurrently, reconciles the
//! API's two response shapes (bare array or single object) into one record
//! type, enriches repository records with their releases and pull requests,
//! and probes the API's rate limit status. Errors are mapped into
//! [`GatherError`] variants so that callers can tell transport, decode, and
//! rate limit failures apart without depending on Reqwest or Octocrab.

pub mod error;
pub mod gateway;
pub mod gather;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod shape;
pub mod target;

pub use error::GatherError;
pub use gateway::{
    FetchResponse, FetchSettings, HttpFetcher, OctocrabPullRequestGateway, PullRequestGateway,
    ReqwestFetcher,
};
pub use gather::{Gatherer, releases_url};
pub use locator::{ApiToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{Datum, GatherReport, PullRequest, Release};
pub use pagination::{ListPullRequestsParams, PullRequestState};
pub use rate_limit::{RateLimitProbe, RateLimits};
pub use shape::{DecodedResponse, ResponseShape, is_array};
pub use target::{Target, TargetSources};

#[cfg(test)]
pub use gateway::{MockHttpFetcher, MockPullRequestGateway};

#[cfg(test)]
mod tests;
