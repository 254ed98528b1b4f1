//! Collection sync: library fetch, TMDB aggregation, box set creation, refresh
//!
//! Runs strictly in order: fetch -> aggregate -> error log -> create -> refresh.
//! Only the library fetch, the error log write and the refresh can end a run
//! early; per-movie and per-group failures are logged and skipped.

pub mod creator;
pub mod models;
pub mod refresh;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;

use tracing::info;

use crate::error::{SyncError, SyncResult};
use crate::services::{CollectionLookup, MediaServer};

pub use creator::{CreationReport, create_collections};
pub use models::{CollectionGroup, CollectionMap, CollectionRef, ErrorRecord, Movie, SyncReport};
pub use refresh::refresh_collections;
pub use resolver::{Aggregation, Resolution, aggregate, resolve_movie, write_error_log};

/// Per-run settings the pipeline needs
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub error_file: PathBuf,
    pub collections_folder: String,
    /// Stop after aggregation without writing anything to the server
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            error_file: PathBuf::from("collection-errors.txt"),
            collections_folder: "Collections".to_string(),
            dry_run: false,
        }
    }
}

/// Fetch every movie in the library. Any failure here is fatal for the run.
pub async fn fetch_library<S>(server: &S) -> SyncResult<Vec<Movie>>
where
    S: MediaServer + ?Sized,
{
    info!("Getting initial data from Jellyfin.");
    info!("If you have a large library, this can take a while. Please be patient.");

    let movies = server
        .list_movies()
        .await
        .map_err(|e| SyncError::LibraryFetch(Box::new(e)))?;

    info!("Successfully authenticated with Jellyfin!");
    info!(movies = movies.len(), "Beginning to search for collection info!");
    Ok(movies)
}

pub async fn run<S, L>(options: &SyncOptions, server: &S, lookup: &L) -> SyncResult<SyncReport>
where
    S: MediaServer + ?Sized,
    L: CollectionLookup + ?Sized,
{
    let movies = fetch_library(server).await?;
    let aggregation = aggregate(lookup, &movies).await;
    write_error_log(&options.error_file, &aggregation.errors).await?;

    let mut report = SyncReport {
        movies_scanned: movies.len(),
        skipped_no_data: aggregation.skipped,
        lookup_failures: aggregation.errors.len(),
        groups_found: aggregation.collections.len(),
        groups_eligible: aggregation.collections.eligible_count(),
        ..Default::default()
    };

    info!("{}", "=".repeat(42));
    info!("Data lookup complete!");

    if options.dry_run {
        for (id, group) in aggregation.collections.iter() {
            if group.is_eligible() {
                info!(
                    tmdb_id = id,
                    movies = group.ids.len(),
                    "Would create {}",
                    group.raw_name
                );
            }
        }
        info!("Dry run: no collections were created");
        return Ok(report);
    }

    info!("Starting to create collections...");
    let creation = create_collections(server, &aggregation.collections).await;
    report.collections_populated = creation.populated;
    report.collection_failures = creation.failures.len();

    refresh_collections(server, &options.collections_folder).await?;

    Ok(report)
}
