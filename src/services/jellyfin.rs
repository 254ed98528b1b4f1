//! Jellyfin REST client
//!
//! Authenticates with an API key sent as `X-Emby-Token` on every request.
//! An API key can be generated in the Jellyfin dashboard under
//! Advanced -> API Keys.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use super::MediaServer;
use super::rate_limiter::{ResponseExt, read_json};
use crate::error::{SyncError, SyncResult};
use crate::sync::models::{ItemsResponse, LibraryItem, Movie};

const TOKEN_HEADER: &str = "X-Emby-Token";

/// Timeouts for Jellyfin requests
#[derive(Debug, Clone)]
pub struct JellyfinTimeouts {
    /// Deadline for ordinary calls
    pub request: Duration,
    /// Deadline for the bulk movie listing, which can be slow on large libraries
    pub library: Duration,
}

impl Default for JellyfinTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(5),
            library: Duration::from_secs(500),
        }
    }
}

pub struct JellyfinClient {
    client: Client,
    base_url: String,
    library_timeout: Duration,
}

impl JellyfinClient {
    pub fn new(base_url: &str, api_key: &str, timeouts: JellyfinTimeouts) -> SyncResult<Self> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(api_key)
            .map_err(|_| SyncError::Config("Jellyfin API key is not a valid header value".into()))?;
        token.set_sensitive(true);
        headers.insert(TOKEN_HEADER, token);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeouts.request)
            .build()
            .map_err(|e| SyncError::Config(format!("cannot build Jellyfin HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            library_timeout: timeouts.library,
        })
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    fn movies_url(&self) -> String {
        self.url("/Items?Recursive=true&IncludeItemTypes=Movie")
    }

    fn box_sets_url(&self) -> String {
        self.url("/Items?Recursive=true&IncludeItemTypes=BoxSet")
    }

    fn create_collection_url(&self, encoded_name: &str) -> String {
        self.url(&format!("/Collections?Name={}", encoded_name))
    }

    fn add_items_url(&self, collection_id: &str, item_ids: &[String]) -> String {
        self.url(&format!(
            "/Collections/{}/Items?Ids={}",
            collection_id,
            item_ids.join(",")
        ))
    }

    fn media_folders_url(&self) -> String {
        self.url("/Library/MediaFolders")
    }

    fn refresh_url(&self, item_id: &str) -> String {
        self.url(&format!(
            "/Items/{}/Refresh?Recursive=true&MetadataRefreshMode=FullRefresh&ImageRefreshMode=FullRefresh",
            item_id
        ))
    }

    async fn get_items<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> SyncResult<Vec<T>> {
        debug!(url = %url, "GET");
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SyncError::request(url, e))?
            .ensure_success(url)?;

        let listing: ItemsResponse<T> = read_json(response, url).await?;
        Ok(listing.items)
    }

    async fn post(&self, url: &str) -> SyncResult<()> {
        debug!(url = %url, "POST");
        self.client
            .post(url)
            .send()
            .await
            .map_err(|e| SyncError::request(url, e))?
            .ensure_success(url)?;
        Ok(())
    }
}

#[async_trait]
impl MediaServer for JellyfinClient {
    async fn list_movies(&self) -> SyncResult<Vec<Movie>> {
        self.get_items(&self.movies_url(), Some(self.library_timeout))
            .await
    }

    async fn create_collection(&self, encoded_name: &str) -> SyncResult<()> {
        self.post(&self.create_collection_url(encoded_name)).await
    }

    async fn list_box_sets(&self) -> SyncResult<Vec<LibraryItem>> {
        self.get_items(&self.box_sets_url(), None).await
    }

    async fn add_to_collection(&self, collection_id: &str, item_ids: &[String]) -> SyncResult<()> {
        self.post(&self.add_items_url(collection_id, item_ids)).await
    }

    async fn media_folders(&self) -> SyncResult<Vec<LibraryItem>> {
        self.get_items(&self.media_folders_url(), None).await
    }

    async fn refresh_item(&self, item_id: &str) -> SyncResult<()> {
        self.post(&self.refresh_url(item_id)).await
    }
}
