//! Sync statistics.

use crate::error::Error;

/// Per-collection sync state.
#[derive(Debug, Default, Clone)]
pub struct CollectionState {
    pub collection_name: String,

    pub pages_fetched: u64,
    pub posts_seen: u64,

    // Cache
    pub files_downloaded: u64,
    pub cache_hits: u64,

    // Links
    pub links_created: u64,
    pub links_existing: u64,

    // Per-item failures
    pub unresolvable: u64,
    pub download_failures: u64,
    pub link_failures: u64,
    pub metadata_failures: u64,
}

impl CollectionState {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            ..Default::default()
        }
    }

    /// Number of per-item failures that were reported and skipped.
    pub fn item_failures(&self) -> u64 {
        self.unresolvable + self.download_failures + self.link_failures
    }
}

/// A collection whose pagination was aborted.
#[derive(Debug)]
pub struct CollectionFailure {
    pub collection_name: String,
    pub error: Error,
    /// Progress made before the failure.
    pub partial: CollectionState,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub synced: Vec<CollectionState>,
    pub failed: Vec<CollectionFailure>,
    /// Requested names that matched no remote collection.
    pub unmatched: Vec<String>,
}

impl RunReport {
    pub fn add_synced(&mut self, state: CollectionState) {
        self.synced.push(state);
    }

    pub fn add_failed(&mut self, collection_name: String, error: Error, partial: CollectionState) {
        self.failed.push(CollectionFailure {
            collection_name,
            error,
            partial,
        });
    }

    /// Every collection state, including partial progress of failed ones.
    fn all_states(&self) -> impl Iterator<Item = &CollectionState> {
        self.synced.iter().chain(self.failed.iter().map(|f| &f.partial))
    }

    pub fn files_downloaded(&self) -> u64 {
        self.all_states().map(|s| s.files_downloaded).sum()
    }

    pub fn links_created(&self) -> u64 {
        self.all_states().map(|s| s.links_created).sum()
    }

    pub fn item_failures(&self) -> u64 {
        self.all_states().map(|s| s.item_failures()).sum()
    }
}
