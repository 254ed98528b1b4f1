//! External service integrations

pub mod jellyfin;
pub mod rate_limiter;
pub mod tmdb;

use async_trait::async_trait;

use crate::error::SyncResult;
use crate::sync::models::{CollectionRef, LibraryItem, Movie};

pub use jellyfin::{JellyfinClient, JellyfinTimeouts};
pub use rate_limiter::{RateLimitConfig, RateLimitedClient};
pub use tmdb::TmdbClient;

/// The media server whose library is being organized
#[async_trait]
pub trait MediaServer: Send + Sync {
    /// Every movie item in the library, recursively
    async fn list_movies(&self) -> SyncResult<Vec<Movie>>;

    /// Create a box set; `encoded_name` is already percent-encoded
    async fn create_collection(&self, encoded_name: &str) -> SyncResult<()>;

    /// Every box set currently on the server
    async fn list_box_sets(&self) -> SyncResult<Vec<LibraryItem>>;

    async fn add_to_collection(&self, collection_id: &str, item_ids: &[String]) -> SyncResult<()>;

    /// Top-level library folders
    async fn media_folders(&self) -> SyncResult<Vec<LibraryItem>>;

    /// Full recursive metadata and image refresh of one item
    async fn refresh_item(&self, item_id: &str) -> SyncResult<()>;
}

/// Source of collection membership for a movie
#[async_trait]
pub trait CollectionLookup: Send + Sync {
    /// `Ok(None)` when the provider knows the movie but it belongs to no collection
    async fn movie_collection(&self, provider_id: &str) -> SyncResult<Option<CollectionRef>>;
}
