//! Records flowing through a sync run

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Deserialize;

/// Provider key under which Jellyfin stores the TMDB id
pub const TMDB_PROVIDER_KEY: &str = "Tmdb";

/// A movie as listed by the media server
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    /// Server-assigned item id
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider_ids: Option<HashMap<String, String>>,
}

impl Movie {
    /// TMDB id of this movie, if the server has one on record.
    ///
    /// Empty values are treated the same as a missing entry.
    pub fn tmdb_id(&self) -> Option<&str> {
        self.provider_ids
            .as_ref()
            .and_then(|ids| ids.get(TMDB_PROVIDER_KEY))
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
    }
}

/// Any item in a `{"Items": [...]}` listing where only id and name matter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Envelope of every `/Items`-style listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

/// First item whose display name equals `name` exactly.
///
/// Names are not unique on the server; when several items share one, the
/// first in listing order wins.
pub fn find_by_name<'a>(items: &'a [LibraryItem], name: &str) -> Option<&'a LibraryItem> {
    items.iter().find(|item| item.name == name)
}

/// Collection membership reported by the metadata provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    pub id: i64,
    pub name: String,
}

/// Movies sharing one provider collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionGroup {
    /// Percent-encoded name, ready to drop into a query string
    pub name: String,
    /// Display name as the provider reports it
    pub raw_name: String,
    /// Local movie ids, in the order they were processed
    pub ids: Vec<String>,
}

impl CollectionGroup {
    pub fn new(raw_name: &str, first_member: &str) -> Self {
        Self {
            name: urlencoding::encode(raw_name).into_owned(),
            raw_name: raw_name.to_string(),
            ids: vec![first_member.to_string()],
        }
    }

    /// Only groups with at least two movies become server-side collections
    pub fn is_eligible(&self) -> bool {
        self.ids.len() >= 2
    }
}

/// Aggregation result: at most one group per provider collection id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionMap {
    groups: BTreeMap<i64, CollectionGroup>,
}

impl CollectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a movie to the group for `collection`, creating the group on first sight.
    pub fn insert(&mut self, collection: &CollectionRef, movie_id: &str) {
        self.groups
            .entry(collection.id)
            .and_modify(|group| group.ids.push(movie_id.to_string()))
            .or_insert_with(|| CollectionGroup::new(&collection.name, movie_id));
    }

    pub fn get(&self, collection_id: i64) -> Option<&CollectionGroup> {
        self.groups.get(&collection_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&i64, &CollectionGroup)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn eligible_count(&self) -> usize {
        self.groups.values().filter(|g| g.is_eligible()).count()
    }
}

/// A movie whose provider lookup failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.reason)
    }
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub movies_scanned: usize,
    pub skipped_no_data: usize,
    pub lookup_failures: usize,
    pub groups_found: usize,
    pub groups_eligible: usize,
    pub collections_populated: usize,
    pub collection_failures: usize,
}
