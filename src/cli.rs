//! Command-line overrides for environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogFormat;

#[derive(Debug, Default, Parser)]
#[command(name = "boxset-sync")]
#[command(about = "Group Jellyfin movies into collections using TMDB collection data", long_about = None)]
pub struct CliOptions {
    /// Jellyfin base URL (overrides JELLYFIN_URL)
    #[arg(long)]
    pub server_url: Option<String>,

    /// Where to write lookup failures (overrides ERROR_FILE)
    #[arg(long)]
    pub error_file: Option<PathBuf>,

    /// Minimum milliseconds between TMDB requests (overrides TMDB_DELAY_MS)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Name of the Jellyfin library folder holding collections (overrides COLLECTIONS_FOLDER)
    #[arg(long)]
    pub collections_folder: Option<String>,

    /// Log output style (overrides LOG_FORMAT)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Look everything up and report what would be created, without changing the server
    #[arg(long)]
    pub dry_run: bool,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse()
    }
}
