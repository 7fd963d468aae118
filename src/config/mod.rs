//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.ghgather.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `GHGATHER_REPOS`, `GHGATHER_TOKEN`, and so
//!    on, plus the legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--repos`/`-r`, `--token`/`-t`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! api_url = "https://api.github.com"
//! repos = "octocat/hello-world, rust-lang/rust"
//! orgs = "tokio-rs"
//! users = "octocat"
//! token_file = "/run/secrets/github_token"
//! request_timeout_seconds = 30
//! max_retries = 2
//! ```

use std::env;
use std::fs;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::github::error::GatherError;
use crate::github::locator::ApiToken;
use crate::github::pagination::{ListPullRequestsParams, PullRequestState};
use crate::github::target::{Target, TargetSources, split_list};
use crate::github::FetchSettings;

/// Public GitHub API endpoint used when `api_url` is not configured.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_MAX_RETRIES: u64 = 2;
const DEFAULT_RETRY_BACKOFF_MILLIS: u64 = 250;
const DEFAULT_PULLS_PER_PAGE: u64 = 100;

/// Configuration for a gather run.
///
/// # Environment Variables
///
/// - `GHGATHER_API_URL` or `--api-url`: API base URL
/// - `GHGATHER_REPOS` or `--repos`: comma-separated `owner/name` list
/// - `GHGATHER_ORGS` or `--orgs`: comma-separated organisation list
/// - `GHGATHER_USERS` or `--users`: comma-separated user list
/// - `GHGATHER_TOKEN`, `GITHUB_TOKEN`, or `--token`: API token
/// - `GHGATHER_TOKEN_FILE` or `--token-file`: file holding the API token
///
/// # Example
///
/// ```no_run
/// use ghgather::GatherConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = GatherConfig::load().expect("failed to load configuration");
/// let targets = config.targets().expect("at least one target required");
/// let token = config.resolve_token().expect("token file should be readable");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GHGATHER",
    discovery(
        dotfile_name = ".ghgather.toml",
        config_file_name = "ghgather.toml",
        app_name = "ghgather"
    )
)]
pub struct GatherConfig {
    /// GitHub API base URL, for example `https://ghe.example.com/api/v3`.
    ///
    /// Defaults to the public API.
    #[ortho_config(cli_short = 'a')]
    pub api_url: Option<String>,

    /// Repositories to poll, as comma-separated `owner/name` entries.
    #[ortho_config(cli_short = 'r')]
    pub repos: Option<String>,

    /// Organisations whose repositories are polled, comma-separated.
    #[ortho_config(cli_short = 'o')]
    pub orgs: Option<String>,

    /// Users whose repositories are polled, comma-separated.
    #[ortho_config(cli_short = 'u')]
    pub users: Option<String>,

    /// API token.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `GHGATHER_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Path to a file containing the API token.
    ///
    /// Consulted only when `token` is unset.
    #[ortho_config(cli_short = 'f')]
    pub token_file: Option<String>,

    /// Deadline for each HTTP request, in seconds.
    #[ortho_config(cli_short = 'd')]
    pub request_timeout_seconds: u64,

    /// Retries after a transport failure on a single request.
    #[ortho_config(cli_short = 'm')]
    pub max_retries: u64,

    /// Base delay between retries, in milliseconds.
    #[ortho_config(cli_short = 'b')]
    pub retry_backoff_millis: u64,

    /// Page size used when listing pull requests (1 to 100).
    #[ortho_config(cli_short = 'p')]
    pub pulls_per_page: u64,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            repos: None,
            orgs: None,
            users: None,
            token: None,
            token_file: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_millis: DEFAULT_RETRY_BACKOFF_MILLIS,
            pulls_per_page: DEFAULT_PULLS_PER_PAGE,
        }
    }
}

impl GatherConfig {
    /// Configured API base URL, or the public GitHub API.
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Parses the API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::InvalidUrl`] when `api_url` is not a URL.
    pub fn api_base(&self) -> Result<Url, GatherError> {
        Url::parse(self.api_url()).map_err(|error| {
            GatherError::InvalidUrl(format!("{api_url}: {error}", api_url = self.api_url()))
        })
    }

    /// Repositories, organisations, and users split out of their lists.
    #[must_use]
    pub fn target_sources(&self) -> TargetSources {
        TargetSources {
            repositories: split_list(self.repos.as_deref()),
            organisations: split_list(self.orgs.as_deref()),
            users: split_list(self.users.as_deref()),
        }
    }

    /// Builds the ordered target list.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::InvalidUrl`] for an unparsable `api_url` and
    /// [`GatherError::Configuration`] when no target is configured.
    pub fn targets(&self) -> Result<Vec<Target>, GatherError> {
        self.target_sources().targets(&self.api_base()?)
    }

    /// Resolves the API token.
    ///
    /// Sources are tried in order: `token`, the contents of `token_file`, and
    /// the legacy `GITHUB_TOKEN` environment variable. When none is set the
    /// token is anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::Configuration`] when `token_file` is set but
    /// cannot be read.
    pub fn resolve_token(&self) -> Result<ApiToken, GatherError> {
        if let Some(token) = self.token.as_deref() {
            return Ok(ApiToken::new(token));
        }

        if let Some(path) = self.token_file.as_deref() {
            let contents = fs::read_to_string(path).map_err(|error| GatherError::Configuration {
                message: format!("unable to read token file {path}: {error}"),
            })?;
            return Ok(ApiToken::new(contents));
        }

        Ok(env::var("GITHUB_TOKEN").map_or_else(|_| ApiToken::anonymous(), ApiToken::new))
    }

    /// Deadline and retry policy for the HTTP fetcher.
    #[must_use]
    pub fn fetch_settings(&self) -> FetchSettings {
        let max_retries = u32::try_from(self.max_retries).unwrap_or(u32::MAX);
        FetchSettings::default()
            .with_request_timeout(Duration::from_secs(self.request_timeout_seconds))
            .with_max_retries(max_retries)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_millis))
    }

    /// Pull request listing parameters; every state is always listed.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::InvalidPagination`] when `pulls_per_page` is out
    /// of range.
    pub fn pull_request_params(&self) -> Result<ListPullRequestsParams, GatherError> {
        let per_page =
            u8::try_from(self.pulls_per_page).map_err(|_| GatherError::InvalidPagination {
                message: format!("pulls_per_page {} is out of range", self.pulls_per_page),
            })?;
        ListPullRequestsParams::new(PullRequestState::All, per_page)
    }
}

#[cfg(test)]
mod tests;
