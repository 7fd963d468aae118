//! Fan-out/fan-in orchestration of one gather cycle.
//!
//! Every target is fetched concurrently and the cycle only proceeds once all
//! fetches have finished. A single failed primary fetch fails the whole
//! cycle; the results of the other fetches are discarded rather than
//! reported partially. Enrichment of repository records with releases and
//! pull requests happens afterwards, one target at a time, and its failures
//! are logged and tolerated.

use futures::future::join_all;

use super::error::GatherError;
use super::gateway::{FetchResponse, HttpFetcher, PullRequestGateway};
use super::locator::{ApiToken, RepositoryLocator};
use super::models::{Datum, GatherReport, PullRequest, Release};
use super::shape::DecodedResponse;
use super::target::Target;

/// Derives the releases URL of a repository target.
///
/// Everything from the first `?` onwards is dropped before `/releases` is
/// appended.
#[must_use]
pub fn releases_url(target_url: &str) -> String {
    let base = target_url
        .split_once('?')
        .map_or(target_url, |(before, _)| before);
    format!("{}/releases", base.trim_end_matches('/'))
}

/// Runs gather cycles using a fetcher and a pull request gateway.
pub struct Gatherer<'client, Fetcher, Pulls>
where
    Fetcher: HttpFetcher,
    Pulls: PullRequestGateway,
{
    fetcher: &'client Fetcher,
    pulls: &'client Pulls,
}

impl<'client, Fetcher, Pulls> Gatherer<'client, Fetcher, Pulls>
where
    Fetcher: HttpFetcher,
    Pulls: PullRequestGateway,
{
    /// Create a gatherer using the provided gateways.
    #[must_use]
    pub const fn new(fetcher: &'client Fetcher, pulls: &'client Pulls) -> Self {
        Self { fetcher, pulls }
    }

    /// Fetch, classify, and enrich every target.
    ///
    /// Records are returned in target order, with array responses expanded
    /// inline.
    ///
    /// # Errors
    ///
    /// Returns the first failure, in target order, among the primary fetches:
    /// a transport error, a non-success status, or an undecodable body. No
    /// partial report is produced.
    pub async fn gather(
        &self,
        targets: &[Target],
        token: &ApiToken,
    ) -> Result<GatherReport, GatherError> {
        let fetches = targets
            .iter()
            .map(|target| self.fetcher.fetch(target.as_str(), token));

        let responses = join_all(fetches)
            .await
            .into_iter()
            .map(|result| result.and_then(FetchResponse::into_success))
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = GatherReport::default();
        for response in &responses {
            self.absorb(response, token, &mut report).await?;
        }
        Ok(report)
    }

    async fn absorb(
        &self,
        response: &FetchResponse,
        token: &ApiToken,
        report: &mut GatherReport,
    ) -> Result<(), GatherError> {
        match DecodedResponse::decode(response.url(), response.body())? {
            DecodedResponse::Array(data) => report.data.extend(data),
            DecodedResponse::Object(datum) => {
                let enriched = self.enrich(datum, response.url(), token).await;
                report
                    .pull_requests
                    .extend(enriched.pull_requests.iter().cloned());
                report.data.push(enriched);
            }
        }

        tracing::info!("API data fetched for {}", response.url());
        Ok(())
    }

    async fn enrich(&self, mut datum: Datum, url: &str, token: &ApiToken) -> Datum {
        let Ok(locator) = RepositoryLocator::from_target_url(url) else {
            return datum;
        };

        datum.releases = self.releases(url, token).await;
        datum.pull_requests = self.pull_requests(&locator, token).await;
        datum
    }

    async fn releases(&self, url: &str, token: &ApiToken) -> Vec<Release> {
        self.fetch_releases(url, token)
            .await
            .unwrap_or_else(|error| {
                tracing::error!("unable to obtain releases for {url}: {error}");
                Vec::new()
            })
    }

    async fn fetch_releases(&self, url: &str, token: &ApiToken) -> Result<Vec<Release>, GatherError> {
        let releases_url = releases_url(url);
        let response = self
            .fetcher
            .fetch(&releases_url, token)
            .await?
            .into_success()?;

        serde_json::from_slice(response.body()).map_err(|error| GatherError::Decode {
            url: releases_url,
            message: error.to_string(),
        })
    }

    async fn pull_requests(&self, locator: &RepositoryLocator, token: &ApiToken) -> Vec<PullRequest> {
        self.pulls
            .list_all(locator, token)
            .await
            .unwrap_or_else(|error| {
                tracing::error!(
                    "unable to obtain pull requests for {owner}/{repo}: {error}",
                    owner = locator.owner().as_str(),
                    repo = locator.repository().as_str()
                );
                Vec::new()
            })
    }
}
