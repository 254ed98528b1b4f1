//! Error types shared by the media-server and provider boundaries

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("cannot read the movie library from the media server: {0}")]
    LibraryFetch(#[source] Box<SyncError>),

    #[error("no media folder named \"{0}\" exists on the server; create it with exactly that name")]
    FolderNotFound(String),

    #[error("no box set named \"{0}\" found after creating it")]
    BoxSetNotFound(String),

    #[error("failed to write error log {}: {source}", .path.display())]
    ErrorLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Wrap a transport error. The request URL is dropped from `source`
    /// because its query can carry an API key; `url` is kept without one.
    pub(crate) fn request(url: &str, source: reqwest::Error) -> Self {
        SyncError::Request {
            url: url.to_string(),
            source: source.without_url(),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
