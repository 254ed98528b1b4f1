//! Boxset Sync - builds Jellyfin collections from TMDB collection data
//!
//! Every movie in the Jellyfin library that carries a TMDB id is looked up on
//! TMDB; movies that TMDB places in the same collection are gathered into a
//! Jellyfin box set, and the collections folder is refreshed afterwards.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod services;
pub mod sync;

pub use error::{SyncError, SyncResult};
