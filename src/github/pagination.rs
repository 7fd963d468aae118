//! Parameters for walking paginated GitHub list resources.
//!
//! Pages are followed through the `Link: rel="next"` cursor GitHub returns
//! with every list response, so the only knobs are the state filter and the
//! page size.

use super::error::GatherError;

/// GitHub's maximum page size for list endpoints.
pub const MAX_PER_PAGE: u8 = 100;

/// Pull request state filter for listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullRequestState {
    /// Only open pull requests.
    Open,
    /// Only closed pull requests, merged ones included.
    Closed,
    /// All pull requests regardless of state.
    #[default]
    All,
}

impl PullRequestState {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// Parameters for listing every pull request of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPullRequestsParams {
    state: PullRequestState,
    per_page: u8,
}

impl ListPullRequestsParams {
    /// Validates and builds listing parameters.
    ///
    /// # Errors
    ///
    /// Returns `GatherError::InvalidPagination` when `per_page` is zero or
    /// above [`MAX_PER_PAGE`].
    pub fn new(state: PullRequestState, per_page: u8) -> Result<Self, GatherError> {
        if per_page == 0 {
            return Err(GatherError::InvalidPagination {
                message: "per_page must be at least 1".to_owned(),
            });
        }

        if per_page > MAX_PER_PAGE {
            return Err(GatherError::InvalidPagination {
                message: format!("per_page must not exceed {MAX_PER_PAGE}"),
            });
        }

        Ok(Self { state, per_page })
    }

    /// State filter sent with the first page request.
    #[must_use]
    pub const fn state(&self) -> PullRequestState {
        self.state
    }

    /// Items requested per page.
    #[must_use]
    pub const fn per_page(&self) -> u8 {
        self.per_page
    }
}

impl Default for ListPullRequestsParams {
    fn default() -> Self {
        Self {
            state: PullRequestState::All,
            per_page: MAX_PER_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ListPullRequestsParams, PullRequestState};
    use crate::github::error::GatherError;

    #[rstest]
    fn defaults_list_every_state_at_maximum_page_size() {
        let params = ListPullRequestsParams::default();
        assert_eq!(params.state(), PullRequestState::All);
        assert_eq!(params.state().as_str(), "all");
        assert_eq!(params.per_page(), 100);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::over_maximum(101)]
    fn rejects_out_of_range_page_sizes(#[case] per_page: u8) {
        let result = ListPullRequestsParams::new(PullRequestState::All, per_page);
        assert!(
            matches!(result, Err(GatherError::InvalidPagination { .. })),
            "expected InvalidPagination, got {result:?}"
        );
    }

    #[rstest]
    fn accepts_boundaries() {
        assert!(ListPullRequestsParams::new(PullRequestState::Open, 1).is_ok());
        assert!(ListPullRequestsParams::new(PullRequestState::Closed, 100).is_ok());
    }
}
