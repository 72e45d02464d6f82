//! Topsites - fetch a country's Alexa Top Sites ranking.
//!
//! Requests `--count` entries starting at `--start`, 1000 per signed request,
//! printing the accumulated ranking and rewriting the JSON snapshot after
//! every request.
//!
//! # Usage
//!
//! ```text
//! topsites --key AKID --secret SECRET --country US --count 2500
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_ACCESS_KEY_ID` | *(unset)* | Fallback for `--key` |
//! | `AWS_SECRET_ACCESS_KEY` | *(unset)* | Fallback for `--secret` |
//! | `TOPSITES_ENDPOINT` | `ats.amazonaws.com` | Host requests are sent to |
//! | `TOPSITES_SIGNING_HOST` | `ats.us-west-1.amazonaws.com` | Signed `host` header |
//! | `TOPSITES_OUTPUT` | `top_alexa.json` | Snapshot path |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use topsites_auth::{Credentials, TimeContext};
use topsites_core::{
    ConsoleSink, HttpTransport, JsonSnapshotSink, PaginationController, RankingRequest,
    RunSummary, TopSitesConfig,
};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Exit status when the requested count is below 1 or out of range.
const EXIT_INVALID_COUNT: u8 = 2;

/// Get a range of Alexa Top Sites for a specific country.
#[derive(Debug, Parser)]
#[command(name = "topsites", version, about)]
struct Cli {
    /// Access key ID.
    #[arg(long = "key", env = "AWS_ACCESS_KEY_ID")]
    access_key_id: String,

    /// Secret access key.
    #[arg(long = "secret", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: String,

    /// ISO country code, e.g. `US`.
    #[arg(long = "country")]
    country_code: String,

    /// Number of entries to fetch (at least 1).
    #[arg(long, allow_negative_numbers = true)]
    count: i64,

    /// Rank of the first entry.
    #[arg(long, default_value_t = 1)]
    start: u32,

    /// Snapshot path (overrides `TOPSITES_OUTPUT`).
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr; stdout carries the ranking.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Apply command-line overrides on top of the environment configuration.
fn build_config(cli: &Cli, mut config: TopSitesConfig) -> TopSitesConfig {
    if let Some(output) = &cli.output {
        config.output_path = output.display().to_string();
    }
    config
}

/// Check the requested count before anything is signed or sent.
fn validate_count(count: i64) -> Result<u32, ExitCode> {
    if count < 1 {
        eprintln!("The number must be greater than 0.");
        return Err(ExitCode::from(EXIT_INVALID_COUNT));
    }
    u32::try_from(count).map_err(|_| {
        eprintln!("The number must not exceed {}.", u32::MAX);
        ExitCode::from(EXIT_INVALID_COUNT)
    })
}

fn run(cli: Cli, count: u32, config: TopSitesConfig) -> Result<RunSummary> {
    let credentials =
        Credentials::new(cli.access_key_id, cli.secret_access_key).context("invalid credentials")?;
    let request = RankingRequest::new(cli.country_code, count).with_start(cli.start);

    let time = TimeContext::now();
    let transport = HttpTransport::new().context("failed to initialise HTTP client")?;

    let mut controller = PaginationController::new(transport, config.clone())
        .with_sink(ConsoleSink::stdout())
        .with_sink(JsonSnapshotSink::new(&config.output_path));

    controller
        .run(&credentials, &time, &request)
        .with_context(|| format!("failed to fetch ranking for {}", request.country_code))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli, TopSitesConfig::from_env());

    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    let count = match validate_count(cli.count) {
        Ok(count) => count,
        Err(code) => return code,
    };

    match config.to_json() {
        Ok(json) => debug!(config = %json, "loaded configuration"),
        Err(e) => debug!(error = %e, "configuration is not serializable"),
    }

    info!(
        country = %cli.country_code,
        count,
        start = cli.start,
        output = %config.output_path,
        version = env!("CARGO_PKG_VERSION"),
        "starting topsites",
    );

    match run(cli, count, config) {
        Ok(summary) => {
            info!(windows = summary.windows, ranks = summary.ranks, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "run aborted");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const BASE_ARGS: [&str; 9] = [
        "topsites", "--key", "AKID", "--secret", "SECRET", "--country", "US", "--count", "2500",
    ];

    #[test]
    fn test_should_validate_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_should_default_start_to_one() {
        let cli = Cli::try_parse_from(BASE_ARGS).unwrap();
        assert_eq!(cli.start, 1);
        assert_eq!(cli.count, 2500);
        assert_eq!(cli.country_code, "US");
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_should_accept_negative_count_for_later_validation() {
        let mut args = BASE_ARGS.to_vec();
        args[8] = "-5";
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.count, -5);
    }

    #[test]
    fn test_should_accept_positive_count() {
        assert!(matches!(validate_count(1), Ok(1)));
        assert!(matches!(validate_count(2500), Ok(2500)));
        assert!(matches!(validate_count(i64::from(u32::MAX)), Ok(u32::MAX)));
    }

    #[test]
    fn test_should_reject_count_below_one_with_status_two() {
        for count in [0, -1, -5] {
            let code = validate_count(count).unwrap_err();
            assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::from(2)));
        }
    }

    #[test]
    fn test_should_reject_count_beyond_u32_range() {
        let code = validate_count(i64::from(u32::MAX) + 1).unwrap_err();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::from(2)));
    }

    #[test]
    fn test_should_require_country() {
        let result = Cli::try_parse_from([
            "topsites", "--key", "AKID", "--secret", "SECRET", "--count", "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_should_override_output_path() {
        let mut args = BASE_ARGS.to_vec();
        args.extend(["--output", "/tmp/out.json", "--start", "1001"]);
        let cli = Cli::try_parse_from(args).unwrap();
        let config = build_config(&cli, TopSitesConfig::default());
        assert_eq!(config.output_path, "/tmp/out.json");
        assert_eq!(cli.start, 1001);
    }
}
