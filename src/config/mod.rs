//! Application configuration management

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::cli::CliOptions;
use crate::logging::LogFormat;
use crate::services::tmdb::DEFAULT_BASE_URL;
use crate::services::{JellyfinTimeouts, RateLimitConfig};
use crate::sync::SyncOptions;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Jellyfin base URL, without trailing slash
    pub server_url: String,

    /// Jellyfin API key
    pub jellyfin_api_key: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API root
    pub tmdb_base_url: String,

    /// Minimum spacing between TMDB requests
    pub lookup_delay: Duration,

    /// Deadline for ordinary requests
    pub request_timeout: Duration,

    /// Deadline for the bulk movie listing
    pub library_timeout: Duration,

    /// File receiving one line per failed lookup
    pub error_file: PathBuf,

    /// Display name of the Jellyfin folder holding box sets
    pub collections_folder: String,

    pub log_format: LogFormat,

    pub dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} is required"))
        };
        let millis = |key: &str, default: u64| -> Result<Duration> {
            match var(key) {
                Some(v) => Ok(Duration::from_millis(
                    v.trim().parse().with_context(|| format!("Invalid {key}: {v}"))?,
                )),
                None => Ok(Duration::from_millis(default)),
            }
        };
        let secs = |key: &str, default: u64| -> Result<Duration> {
            match var(key) {
                Some(v) => Ok(Duration::from_secs(
                    v.trim().parse().with_context(|| format!("Invalid {key}: {v}"))?,
                )),
                None => Ok(Duration::from_secs(default)),
            }
        };

        let log_format = match var("LOG_FORMAT") {
            Some(v) => v
                .parse::<LogFormat>()
                .map_err(anyhow::Error::msg)
                .context("Invalid LOG_FORMAT")?,
            None => LogFormat::default(),
        };

        Ok(Self {
            server_url: normalize_url(&required("JELLYFIN_URL")?)?,

            jellyfin_api_key: required("JELLYFIN_API_KEY")?,

            tmdb_api_key: required("TMDB_API_KEY")?,

            tmdb_base_url: normalize_url(
                &var("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            )?,

            lookup_delay: millis("TMDB_DELAY_MS", 500)?,

            request_timeout: secs("REQUEST_TIMEOUT_SECS", 5)?,

            library_timeout: secs("LIBRARY_TIMEOUT_SECS", 500)?,

            error_file: var("ERROR_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("collection-errors.txt")),

            collections_folder: var("COLLECTIONS_FOLDER")
                .unwrap_or_else(|| "Collections".to_string()),

            log_format,

            dry_run: false,
        })
    }

    /// Let command-line flags win over the environment
    pub fn apply_cli(mut self, cli: &CliOptions) -> Result<Self> {
        if let Some(url) = &cli.server_url {
            self.server_url = normalize_url(url)?;
        }
        if let Some(path) = &cli.error_file {
            self.error_file = path.clone();
        }
        if let Some(delay) = cli.delay_ms {
            self.lookup_delay = Duration::from_millis(delay);
        }
        if let Some(folder) = &cli.collections_folder {
            self.collections_folder = folder.clone();
        }
        if let Some(format) = cli.log_format {
            self.log_format = format;
        }
        self.dry_run |= cli.dry_run;
        Ok(self)
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            error_file: self.error_file.clone(),
            collections_folder: self.collections_folder.clone(),
            dry_run: self.dry_run,
        }
    }

    pub fn tmdb_rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            min_interval: self.lookup_delay,
            timeout: self.request_timeout,
        }
    }

    pub fn jellyfin_timeouts(&self) -> JellyfinTimeouts {
        JellyfinTimeouts {
            request: self.request_timeout,
            library: self.library_timeout,
        }
    }
}

/// Validate an http(s) base URL and drop any trailing slash
fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).with_context(|| format!("Invalid URL: {trimmed}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Unsupported URL scheme in {trimmed}");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
