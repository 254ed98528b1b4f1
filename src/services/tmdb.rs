//! TMDB (The Movie Database) API client for collection membership
//!
//! TMDB is a popular movie/TV database with a free API.
//! Base URL: https://api.themoviedb.org/3
//!
//! TMDB enforces a request quota, so every lookup goes through a
//! [`RateLimitedClient`] that spaces requests a fixed interval apart.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::CollectionLookup;
use super::rate_limiter::{RateLimitConfig, RateLimitedClient, ResponseExt, read_json};
use crate::error::SyncResult;
use crate::sync::models::CollectionRef;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB API client with rate limiting
pub struct TmdbClient {
    client: RateLimitedClient,
    base_url: String,
    api_key: String,
}

/// Movie details from TMDB, trimmed to what collection lookup needs
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    /// Collection info (only in movie details, not search)
    #[serde(default)]
    pub belongs_to_collection: Option<TmdbCollectionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCollectionInfo {
    pub id: i64,
    pub name: String,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(base_url: &str, api_key: String, rate_limit: RateLimitConfig) -> SyncResult<Self> {
        Ok(Self {
            client: RateLimitedClient::new("tmdb", rate_limit)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// The id comes from server metadata, so it is escaped to stay one path segment.
    fn movie_url(&self, tmdb_id: &str) -> String {
        format!("{}/movie/{}", self.base_url, urlencoding::encode(tmdb_id))
    }

    /// Get movie details by TMDB ID
    pub async fn get_movie(&self, tmdb_id: &str) -> SyncResult<TmdbMovie> {
        let url = self.movie_url(tmdb_id);
        debug!("Fetching movie details from TMDB (ID: {})", tmdb_id);

        let response = self
            .client
            .get_with_query(&url, &[("api_key", self.api_key.as_str())])
            .await?
            .ensure_success(&url)?;

        read_json(response, &url).await
    }
}

#[async_trait]
impl CollectionLookup for TmdbClient {
    async fn movie_collection(&self, provider_id: &str) -> SyncResult<Option<CollectionRef>> {
        let movie = self.get_movie(provider_id).await?;
        Ok(movie.collection())
    }
}

impl TmdbMovie {
    /// The franchise this movie belongs to, if any
    pub fn collection(self) -> Option<CollectionRef> {
        self.belongs_to_collection.map(|c| CollectionRef {
            id: c.id,
            name: c.name,
        })
    }
}
