//! Selection and sequential sync of collections.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::api::Collection;
use crate::download::collection::{sync_collection, SyncContext};
use crate::download::state::{CollectionState, RunReport};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, StoreLayout};

/// Which collections a run should sync.
///
/// Names match exactly and case-sensitively. An empty selection means all.
#[derive(Debug, Clone, Default)]
pub struct CollectionSelection {
    names: HashSet<String>,
}

impl CollectionSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.names.is_empty()
    }

    pub fn matches(&self, collection: &Collection) -> bool {
        self.is_all() || self.names.contains(&collection.name)
    }

    /// Selected collections, in the order of the remote listing.
    pub fn select<'a>(&self, collections: &'a [Collection]) -> Vec<&'a Collection> {
        collections.iter().filter(|c| self.matches(c)).collect()
    }

    /// Requested names that appear nowhere in the listing, sorted.
    pub fn unmatched(&self, collections: &[Collection]) -> Vec<String> {
        let remote: HashSet<&str> = collections.iter().map(|c| c.name.as_str()).collect();
        let mut missing: Vec<String> = self
            .names
            .iter()
            .filter(|name| !remote.contains(name.as_str()))
            .cloned()
            .collect();
        missing.sort();
        missing
    }
}

/// Collection directories handed out during one run.
///
/// Escaping is lossy (`Food/Drink` and `Food_Drink` both escape to
/// `Food_Drink`), and some filesystems ignore case. The first collection keeps
/// the plain name; a later one that would land in the same directory gets its
/// id appended.
#[derive(Debug, Default)]
pub struct DirectoryClaims {
    taken: HashSet<String>,
}

impl DirectoryClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the directory for `collection`.
    pub fn claim(&mut self, layout: &StoreLayout, collection: &Collection) -> Result<PathBuf> {
        let dir = layout.collection_dir(&collection.name)?;
        if self.take(&dir) {
            return Ok(dir);
        }

        let fallback =
            layout.collection_dir(&format!("{} ({})", collection.name, collection.id))?;
        if self.take(&fallback) {
            tracing::warn!(
                "Collection '{}' clashes with an earlier directory, using {}",
                collection.name,
                fallback.display()
            );
            return Ok(fallback);
        }

        Err(Error::InvalidFilename(format!(
            "No free directory for collection '{}'",
            collection.name
        )))
    }

    fn take(&mut self, dir: &Path) -> bool {
        let key = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        self.taken.insert(key)
    }
}

/// Sync every selected collection, one after another.
///
/// Requested names with no remote match are skipped without error. A failure
/// inside one collection is recorded in the report and the run moves on to
/// the next collection.
pub async fn sync_collections(
    ctx: &SyncContext<'_>,
    layout: &StoreLayout,
    collections: &[Collection],
    selection: &CollectionSelection,
) -> RunReport {
    let mut report = RunReport {
        unmatched: selection.unmatched(collections),
        ..Default::default()
    };

    for name in &report.unmatched {
        tracing::info!("No remote collection named '{}', skipping", name);
    }

    let selected = selection.select(collections);
    tracing::info!(
        "Syncing {} of {} collections",
        selected.len(),
        collections.len()
    );

    let mut claims = DirectoryClaims::new();

    for collection in selected {
        let mut state = CollectionState::new(collection.name.clone());

        let result: Result<()> = async {
            let dir = claims.claim(layout, collection)?;
            ensure_dir(&dir).await?;
            sync_collection(ctx, collection, &dir, &mut state).await
        }
        .await;

        match result {
            Ok(()) => report.add_synced(state),
            Err(e) => {
                tracing::warn!("Collection '{}' aborted: {}", collection.name, e);
                report.add_failed(collection.name.clone(), e, state);
            }
        }
    }

    report
}
