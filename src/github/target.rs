//! Target URLs polled once per gather cycle.

use std::fmt;

use url::Url;

use super::error::GatherError;

/// Query string appended to every generated target URL.
const TARGET_QUERY: &str = "?&per_page=100";

/// One API resource URL, identified by its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    /// Wraps an arbitrary resource URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Target for a single repository given as `owner/name`.
    #[must_use]
    pub fn repository(api_base: &Url, full_name: &str) -> Self {
        Self::under(api_base, &format!("repos/{full_name}"))
    }

    /// Target listing an organisation's repositories.
    #[must_use]
    pub fn organisation(api_base: &Url, organisation: &str) -> Self {
        Self::under(api_base, &format!("orgs/{organisation}/repos"))
    }

    /// Target listing a user's repositories.
    #[must_use]
    pub fn user(api_base: &Url, user: &str) -> Self {
        Self::under(api_base, &format!("users/{user}/repos"))
    }

    fn under(api_base: &Url, path: &str) -> Self {
        let base = api_base.as_str().trim_end_matches('/');
        Self(format!("{base}/{path}{TARGET_QUERY}"))
    }

    /// Borrow the URL.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Configured sources from which targets are generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSources {
    /// Repositories as `owner/name`.
    pub repositories: Vec<String>,
    /// Organisation logins.
    pub organisations: Vec<String>,
    /// User logins.
    pub users: Vec<String>,
}

impl TargetSources {
    /// Builds targets in a stable order: repositories, then organisations,
    /// then users.
    ///
    /// # Errors
    ///
    /// Returns `GatherError::Configuration` when no target is configured.
    pub fn targets(&self, api_base: &Url) -> Result<Vec<Target>, GatherError> {
        let repositories = self
            .repositories
            .iter()
            .map(|full_name| Target::repository(api_base, full_name));
        let organisations = self
            .organisations
            .iter()
            .map(|organisation| Target::organisation(api_base, organisation));
        let users = self.users.iter().map(|user| Target::user(api_base, user));

        let targets: Vec<Target> = repositories.chain(organisations).chain(users).collect();
        if targets.is_empty() {
            return Err(GatherError::Configuration {
                message: "at least one repository, organisation, or user is required".to_owned(),
            });
        }
        Ok(targets)
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
#[must_use]
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}
