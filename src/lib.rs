//! ghgather library crate providing concurrent GitHub data gathering.
//!
//! The library fetches a configured set of GitHub API targets in parallel,
//! normalises array and object responses into [`Datum`] records, attaches
//! releases and pull requests to repository records, and probes the API's
//! rate limit status.

pub mod config;
pub mod github;

pub use config::GatherConfig;
pub use github::{
    ApiToken, Datum, GatherError, GatherReport, Gatherer, OctocrabPullRequestGateway, PullRequest,
    RateLimitProbe, RateLimits, Release, ReqwestFetcher, Target,
};
