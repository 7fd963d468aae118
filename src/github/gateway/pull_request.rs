//! Octocrab implementation of the pull request listing gateway.

use async_trait::async_trait;
use octocrab::Page;

use crate::github::error::GatherError;
use crate::github::locator::{ApiToken, RepositoryLocator};
use crate::github::models::PullRequest;
use crate::github::pagination::ListPullRequestsParams;

use super::client::build_octocrab_client;
use super::{FetchSettings, PullRequestGateway};
use super::error_mapping::map_octocrab_error;

/// Octocrab-backed gateway that follows `next` links to exhaustion.
///
/// A client is built per listing against the API base the repository was
/// addressed through, so one gateway serves public GitHub and Enterprise
/// targets alike. Every page request is bounded by the same deadline as the
/// raw fetcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct OctocrabPullRequestGateway {
    params: ListPullRequestsParams,
    settings: FetchSettings,
}

impl OctocrabPullRequestGateway {
    /// Creates a gateway that lists with `params` under `settings`.
    #[must_use]
    pub const fn new(params: ListPullRequestsParams, settings: FetchSettings) -> Self {
        Self { params, settings }
    }
}

#[async_trait]
impl PullRequestGateway for OctocrabPullRequestGateway {
    async fn list_all(
        &self,
        locator: &RepositoryLocator,
        token: &ApiToken,
    ) -> Result<Vec<PullRequest>, GatherError> {
        let client = build_octocrab_client(token, locator.api_base(), &self.settings)?;
        let route = locator.pulls_path();
        let per_page = self.params.per_page().to_string();
        let query_params = [
            ("state", self.params.state().as_str()),
            ("per_page", per_page.as_str()),
        ];

        let mut page: Page<PullRequest> = client
            .get(route.as_str(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &route, &error))?;

        let mut pull_requests = Vec::new();
        loop {
            pull_requests.append(&mut page.items);
            page = match client
                .get_page::<PullRequest>(&page.next)
                .await
                .map_err(|error| map_octocrab_error("list pulls", &route, &error))?
            {
                Some(next_page) => next_page,
                None => break,
            };
        }

        tracing::debug!(
            "listed {count} pull requests for {owner}/{repo}",
            count = pull_requests.len(),
            owner = locator.owner().as_str(),
            repo = locator.repository().as_str()
        );
        Ok(pull_requests)
    }
}
