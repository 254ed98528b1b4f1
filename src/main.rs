//! Boxset Sync entry point
//!
//! Reads configuration from the environment (and `.env`), lets command-line
//! flags override it, then runs one sync pass against Jellyfin and TMDB.

use std::process::ExitCode;

use anyhow::Context;
use boxset_sync::cli::CliOptions;
use boxset_sync::config::Config;
use boxset_sync::logging;
use boxset_sync::services::{JellyfinClient, TmdbClient};
use boxset_sync::sync::{self, SyncReport};

// Everything runs one request at a time, so a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = CliOptions::from_args();

    let config = match Config::from_env().and_then(|c| c.apply_cli(&cli)) {
        Ok(config) => config,
        Err(e) => {
            logging::init(cli.log_format.unwrap_or_default());
            tracing::error!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.log_format);

    finish(run(&config).await)
}

/// Log the outcome of a run and map it to the process exit code.
///
/// Per-movie and per-group failures still count as a completed run; only a fatal error exits 1.
fn finish(outcome: anyhow::Result<SyncReport>) -> ExitCode {
    match outcome {
        Ok(report) => {
            log_report(&report);
            tracing::info!("Thanks for waiting; all done!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> anyhow::Result<SyncReport> {
    tracing::info!(server = %config.server_url, dry_run = config.dry_run, "Starting collection sync");

    let jellyfin = JellyfinClient::new(
        &config.server_url,
        &config.jellyfin_api_key,
        config.jellyfin_timeouts(),
    )?;
    let tmdb = TmdbClient::new(
        &config.tmdb_base_url,
        config.tmdb_api_key.clone(),
        config.tmdb_rate_limit(),
    )?;

    let report = sync::run(&config.sync_options(), &jellyfin, &tmdb)
        .await
        .context("Collection sync aborted")?;
    Ok(report)
}

fn log_report(report: &SyncReport) {
    tracing::info!(
        movies = report.movies_scanned,
        no_data = report.skipped_no_data,
        lookup_failures = report.lookup_failures,
        groups = report.groups_found,
        eligible = report.groups_eligible,
        populated = report.collections_populated,
        collection_failures = report.collection_failures,
        "Run summary"
    );
}
