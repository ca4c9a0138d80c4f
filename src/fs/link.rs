//! Collection directory links into the media cache.

use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fs::cache::CachedFile;

/// What [`ensure_link`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// An entry already existed and was left alone.
    Existing,
    HardLinked,
    /// Hard linking failed and a symbolic link was created instead.
    SymLinked,
}

impl LinkOutcome {
    pub fn created(self) -> bool {
        !matches!(self, LinkOutcome::Existing)
    }
}

/// Make `target` reachable as `<collection_dir>/<filename>`.
///
/// Existing entries are never replaced, even dangling symlinks. A hard link is
/// tried first; if the filesystem refuses it (for example across devices) a
/// symbolic link to the absolute cache path is created. Data is never copied.
pub async fn ensure_link(collection_dir: &Path, filename: &str, target: &CachedFile) -> Result<LinkOutcome> {
    let link_path = collection_dir.join(filename);

    if tokio::fs::symlink_metadata(&link_path).await.is_ok() {
        return Ok(LinkOutcome::Existing);
    }

    let hard_err = match tokio::fs::hard_link(&target.path, &link_path).await {
        Ok(()) => return Ok(LinkOutcome::HardLinked),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(LinkOutcome::Existing),
        Err(e) => e,
    };

    tracing::debug!(
        "Hard link to {} failed ({}), falling back to symlink",
        target.path.display(),
        hard_err
    );

    let absolute = tokio::fs::canonicalize(&target.path)
        .await
        .map_err(|source| Error::Link {
            path: link_path.clone(),
            source,
        })?;

    match symlink(&absolute, &link_path).await {
        Ok(()) => Ok(LinkOutcome::SymLinked),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(LinkOutcome::Existing),
        Err(source) => Err(Error::Link {
            path: link_path,
            source,
        }),
    }
}

#[cfg(unix)]
async fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink(target, link).await
}

#[cfg(windows)]
async fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    tokio::fs::symlink_file(target, link).await
}
