//! Repository identity derived from target URLs, plus the API token wrapper.

use std::fmt;

use url::Url;

use super::error::GatherError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, GatherError> {
        if value.is_empty() {
            return Err(GatherError::InvalidUrl(
                "repository owner segment is empty".to_owned(),
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, GatherError> {
        if value.is_empty() {
            return Err(GatherError::InvalidUrl(
                "repository name segment is empty".to_owned(),
            ));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Bearer token for the GitHub API.
///
/// An empty token is valid and means requests are sent anonymously, which
/// GitHub answers with a lower rate limit.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a token, trimming surrounding whitespace.
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().trim().to_owned())
    }

    /// Token used for unauthenticated requests.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(String::new())
    }

    /// Returns true when no credential will be sent.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }

    /// The token value to send as a bearer credential, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        if self.is_anonymous() {
            None
        } else {
            Some(self.0.as_str())
        }
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.is_anonymous() {
            "<anonymous>"
        } else {
            "<redacted>"
        };
        formatter.debug_tuple("ApiToken").field(&shown).finish()
    }
}

/// A single repository addressed by an API target URL.
///
/// Recognises URLs whose path ends in `/repos/<owner>/<repo>`, optionally
/// preceded by an API prefix such as `/api/v3` on GitHub Enterprise.
///
/// # Example
///
/// ```
/// use ghgather::github::locator::RepositoryLocator;
///
/// let locator = RepositoryLocator::from_target_url(
///     "https://api.github.com/repos/octo/repo?&per_page=100",
/// )
/// .expect("should parse repository URL");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Derives the repository identity and API base from a target URL.
    ///
    /// # Errors
    ///
    /// Returns `GatherError::InvalidUrl` when the URL cannot be parsed or does
    /// not address a single repository resource.
    pub fn from_target_url(input: &str) -> Result<Self, GatherError> {
        let parsed =
            Url::parse(input).map_err(|error| GatherError::InvalidUrl(error.to_string()))?;

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|split| split.filter(|segment| !segment.is_empty()).collect())
            .unwrap_or_default();

        let marker = segments
            .iter()
            .position(|segment| *segment == "repos")
            .ok_or_else(|| not_a_repository(input))?;

        let owner_segment = segments
            .get(marker + 1)
            .ok_or_else(|| not_a_repository(input))?;
        let repository_segment = segments
            .get(marker + 2)
            .ok_or_else(|| not_a_repository(input))?;

        if segments.get(marker + 3).is_some() {
            return Err(not_a_repository(input));
        }

        let prefix = segments.get(..marker).unwrap_or_default().join("/");
        let mut api_base = parsed.clone();
        api_base.set_query(None);
        api_base.set_fragment(None);
        api_base.set_path(&prefix);

        Ok(Self {
            api_base,
            owner: RepositoryOwner::new(owner_segment)?,
            repository: RepositoryName::new(repository_segment)?,
        })
    }

    /// API base URL the repository URL was addressed against.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}

fn not_a_repository(input: &str) -> GatherError {
    GatherError::InvalidUrl(format!("{input} is not a /repos/<owner>/<repo> resource"))
}
