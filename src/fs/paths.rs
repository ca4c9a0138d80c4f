//! Layout of the local store.
//!
//! ```text
//! <root>/
//!   .ORIGINAL_MEDIA/   one physical copy per (post, item)
//!   .JSON/             metadata sidecar per post
//!   <collection>/      links into .ORIGINAL_MEDIA
//! ```

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::escape_collection_name;

/// Directory holding the downloaded media.
pub const MEDIA_DIR: &str = ".ORIGINAL_MEDIA";

/// Directory holding the metadata sidecars.
pub const METADATA_DIR: &str = ".JSON";

/// Paths inside a storage root.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.join(MEDIA_DIR)
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    /// Directory of a collection, named after its escaped name.
    pub fn collection_dir(&self, collection_name: &str) -> Result<PathBuf> {
        Ok(self.root.join(escape_collection_name(collection_name)?))
    }
}

/// Ensure a directory exists, creating it and its parents if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
