//! ghgather CLI entrypoint for one gather cycle.

use std::io::{self, Write};
use std::process::ExitCode;

use ghgather::{
    ApiToken, GatherConfig, GatherError, GatherReport, Gatherer, OctocrabPullRequestGateway,
    RateLimitProbe, RateLimits, ReqwestFetcher,
};
use ortho_config::OrthoConfig;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Document written to stdout after a successful cycle.
#[derive(Serialize)]
struct Summary<'report> {
    #[serde(flatten)]
    report: &'report GatherReport,
    rate_limits: RateLimits,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            drop(writeln!(io::stderr().lock(), "{error}"));
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), GatherError> {
    let config = load_config()?;

    let targets = config.targets()?;
    let token = config.resolve_token()?;

    let settings = config.fetch_settings();
    let fetcher = ReqwestFetcher::new(settings)?;
    let pulls = OctocrabPullRequestGateway::new(config.pull_request_params()?, settings);

    let report = Gatherer::new(&fetcher, &pulls)
        .gather(&targets, &token)
        .await?;
    let rate_limits = probe_rate_limits(&fetcher, config.api_url(), &token).await;

    write_summary(&Summary {
        report: &report,
        rate_limits,
    })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`GatherError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<GatherConfig, GatherError> {
    GatherConfig::load().map_err(|error| GatherError::Configuration {
        message: error.to_string(),
    })
}

async fn probe_rate_limits(fetcher: &ReqwestFetcher, api_url: &str, token: &ApiToken) -> RateLimits {
    RateLimitProbe::new(fetcher)
        .probe(api_url, token)
        .await
        .unwrap_or_else(|error| {
            tracing::warn!("rate limit status unavailable: {error}");
            RateLimits::default()
        })
}

fn write_summary(summary: &Summary<'_>) -> Result<(), GatherError> {
    let rendered =
        serde_json::to_string_pretty(summary).map_err(|error| GatherError::Io {
            message: error.to_string(),
        })?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").map_err(|error| GatherError::Io {
        message: error.to_string(),
    })
}
