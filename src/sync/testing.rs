//! In-memory stand-ins for the media server and the metadata provider

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::models::{CollectionRef, LibraryItem, Movie, TMDB_PROVIDER_KEY};
use crate::error::{SyncError, SyncResult};
use crate::services::{CollectionLookup, MediaServer};

pub fn movie(id: &str, name: &str, tmdb_id: Option<&str>) -> Movie {
    Movie {
        id: id.to_string(),
        name: name.to_string(),
        provider_ids: tmdb_id.map(|tmdb| {
            HashMap::from([(TMDB_PROVIDER_KEY.to_string(), tmdb.to_string())])
        }),
    }
}

fn server_error(url: &str) -> SyncError {
    SyncError::Status {
        url: url.to_string(),
        status: 500,
    }
}

#[derive(Debug, Clone)]
enum LookupAnswer {
    Collection(CollectionRef),
    NoCollection,
    Fail,
}

#[derive(Debug, Default)]
pub struct FakeLookup {
    answers: HashMap<String, LookupAnswer>,
    calls: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn with_collection(mut self, tmdb_id: &str, id: i64, name: &str) -> Self {
        self.answers.insert(
            tmdb_id.to_string(),
            LookupAnswer::Collection(CollectionRef {
                id,
                name: name.to_string(),
            }),
        );
        self
    }

    pub fn without_collection(mut self, tmdb_id: &str) -> Self {
        self.answers
            .insert(tmdb_id.to_string(), LookupAnswer::NoCollection);
        self
    }

    pub fn failing(mut self, tmdb_id: &str) -> Self {
        self.answers.insert(tmdb_id.to_string(), LookupAnswer::Fail);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CollectionLookup for FakeLookup {
    async fn movie_collection(&self, provider_id: &str) -> SyncResult<Option<CollectionRef>> {
        self.calls.lock().unwrap().push(provider_id.to_string());
        match self.answers.get(provider_id) {
            Some(LookupAnswer::Collection(c)) => Ok(Some(c.clone())),
            Some(LookupAnswer::NoCollection) | None => Ok(None),
            Some(LookupAnswer::Fail) => Err(server_error(&format!("/movie/{provider_id}"))),
        }
    }
}

/// Every request the fake server received, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCall {
    ListMovies,
    Create(String),
    ListBoxSets,
    AddItems(String, Vec<String>),
    MediaFolders,
    Refresh(String),
}

#[derive(Debug, Default)]
pub struct FakeServer {
    movies: Vec<Movie>,
    folders: Vec<LibraryItem>,
    box_sets: Mutex<Vec<LibraryItem>>,
    /// Raw names whose creation "succeeds" but never shows up in the box set listing
    renamed: Vec<String>,
    failing_adds: Vec<String>,
    library_down: bool,
    refresh_down: bool,
    calls: Mutex<Vec<ServerCall>>,
}

impl FakeServer {
    pub fn with_movies(mut self, movies: Vec<Movie>) -> Self {
        self.movies = movies;
        self
    }

    pub fn with_folder(mut self, id: &str, name: &str) -> Self {
        self.folders.push(LibraryItem {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn renaming(mut self, raw_name: &str) -> Self {
        self.renamed.push(raw_name.to_string());
        self
    }

    pub fn failing_add(mut self, collection_id: &str) -> Self {
        self.failing_adds.push(collection_id.to_string());
        self
    }

    pub fn library_down(mut self) -> Self {
        self.library_down = true;
        self
    }

    pub fn refresh_down(mut self) -> Self {
        self.refresh_down = true;
        self
    }

    pub fn calls(&self) -> Vec<ServerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ServerCall::Create(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ServerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaServer for FakeServer {
    async fn list_movies(&self) -> SyncResult<Vec<Movie>> {
        self.record(ServerCall::ListMovies);
        if self.library_down {
            return Err(SyncError::Status {
                url: "/Items".to_string(),
                status: 401,
            });
        }
        Ok(self.movies.clone())
    }

    async fn create_collection(&self, encoded_name: &str) -> SyncResult<()> {
        self.record(ServerCall::Create(encoded_name.to_string()));
        let raw = urlencoding::decode(encoded_name)
            .map_err(|e| SyncError::Config(e.to_string()))?
            .into_owned();
        if self.renamed.contains(&raw) {
            return Ok(());
        }
        let mut box_sets = self.box_sets.lock().unwrap();
        let id = format!("bs{}", box_sets.len() + 1);
        box_sets.push(LibraryItem { id, name: raw });
        Ok(())
    }

    async fn list_box_sets(&self) -> SyncResult<Vec<LibraryItem>> {
        self.record(ServerCall::ListBoxSets);
        Ok(self.box_sets.lock().unwrap().clone())
    }

    async fn add_to_collection(&self, collection_id: &str, item_ids: &[String]) -> SyncResult<()> {
        self.record(ServerCall::AddItems(
            collection_id.to_string(),
            item_ids.to_vec(),
        ));
        if self.failing_adds.iter().any(|id| id == collection_id) {
            return Err(server_error(&format!("/Collections/{collection_id}/Items")));
        }
        Ok(())
    }

    async fn media_folders(&self) -> SyncResult<Vec<LibraryItem>> {
        self.record(ServerCall::MediaFolders);
        Ok(self.folders.clone())
    }

    async fn refresh_item(&self, item_id: &str) -> SyncResult<()> {
        self.record(ServerCall::Refresh(item_id.to_string()));
        if self.refresh_down {
            return Err(server_error(&format!("/Items/{item_id}/Refresh")));
        }
        Ok(())
    }
}
