//! Per-movie collection lookup and the single aggregation pass over the library

use std::path::Path;

use tracing::{info, warn};

use super::models::{CollectionMap, CollectionRef, ErrorRecord, Movie};
use crate::error::{SyncError, SyncResult};
use crate::services::CollectionLookup;

/// What a provider lookup did for one movie
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No TMDB id on the server, so the provider was never asked
    NoData,
    /// The provider knows the movie but it is not part of a collection
    NoCollection,
    /// The movie was added to its collection's group
    Grouped(CollectionRef),
}

/// Output of one pass over the library
#[derive(Debug, Default)]
pub struct Aggregation {
    pub collections: CollectionMap,
    pub errors: Vec<ErrorRecord>,
    pub skipped: usize,
}

/// Look up one movie and, if it belongs to a collection, record it in `collections`.
///
/// Leaves `collections` untouched unless the result is [`Resolution::Grouped`].
pub async fn resolve_movie<L>(
    lookup: &L,
    movie: &Movie,
    collections: &mut CollectionMap,
) -> SyncResult<Resolution>
where
    L: CollectionLookup + ?Sized,
{
    let Some(tmdb_id) = movie.tmdb_id() else {
        return Ok(Resolution::NoData);
    };

    info!("Checking {}", movie.name);
    match lookup.movie_collection(tmdb_id).await? {
        Some(collection) => {
            info!(" ┗ Found matching collection: {}!", collection.name);
            collections.insert(&collection, &movie.id);
            Ok(Resolution::Grouped(collection))
        }
        None => Ok(Resolution::NoCollection),
    }
}

/// Resolve every movie in order. A failure on one movie is recorded and the pass moves on.
pub async fn aggregate<L>(lookup: &L, movies: &[Movie]) -> Aggregation
where
    L: CollectionLookup + ?Sized,
{
    let mut aggregation = Aggregation::default();

    for movie in movies {
        match resolve_movie(lookup, movie, &mut aggregation.collections).await {
            Ok(Resolution::NoData) => {
                info!("No entry found for {} - continuing.", movie.name);
                aggregation.skipped += 1;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Error on {} - {}. Continuing.", movie.name, e);
                aggregation.errors.push(ErrorRecord {
                    name: movie.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    aggregation
}

/// Write one `<name> - <reason>` line per record.
///
/// Returns `false` without touching the filesystem when there is nothing to write.
pub async fn write_error_log(path: &Path, errors: &[ErrorRecord]) -> SyncResult<bool> {
    if errors.is_empty() {
        return Ok(false);
    }

    let contents: String = errors.iter().map(|e| format!("{e}\n")).collect();
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| SyncError::ErrorLog {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        path = %path.display(),
        count = errors.len(),
        "Wrote lookup errors for manual review"
    );
    Ok(true)
}
