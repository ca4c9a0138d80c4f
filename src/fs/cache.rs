//! Content-addressed media cache.
//!
//! Every `(post, item)` pair maps to one file under `.ORIGINAL_MEDIA`. The file
//! is downloaded the first time it is needed and never touched again; later
//! requests for the same pair are answered from disk without a network call,
//! even when the CDN now serves the item under a different extension.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;

use crate::download::MediaFetcher;
use crate::error::{Error, Result};
use crate::fs::naming::{cache_file_name, extension_from_url, sidecar_file_name};
use crate::fs::paths::{ensure_dir, StoreLayout};
use crate::media::{id_to_url, shortcode_for, Post};

/// Suffix of a file that is still being downloaded.
const PARTIAL_SUFFIX: &str = "part";

/// A media file present in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFile {
    pub path: PathBuf,
    pub extension: String,
    /// `true` when this call performed the download.
    pub downloaded: bool,
}

impl CachedFile {
    /// File name shared by the cache entry and every collection link to it.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Sidecar document written next to the media.
#[derive(Serialize)]
struct Sidecar<'a> {
    id: u64,
    url: String,
    owner: &'a str,
    synced_at: String,
    media: &'a serde_json::Value,
}

/// Media cache rooted in a store layout.
pub struct ContentCache {
    media_dir: PathBuf,
    metadata_dir: PathBuf,
    fetcher: Arc<dyn MediaFetcher>,
    /// Cached files by name without extension (`<shortcode>[.<index>]`).
    stems: Mutex<HashMap<String, PathBuf>>,
}

impl ContentCache {
    pub fn new(layout: &StoreLayout, fetcher: Arc<dyn MediaFetcher>) -> Self {
        Self {
            media_dir: layout.media_dir(),
            metadata_dir: layout.metadata_dir(),
            fetcher,
            stems: Mutex::new(HashMap::new()),
        }
    }

    /// Create the cache and metadata directories and index the files already
    /// in the cache.
    pub async fn prepare(&self) -> Result<()> {
        ensure_dir(&self.media_dir).await?;
        ensure_dir(&self.metadata_dir).await?;

        let mut found = HashMap::new();
        let mut entries = tokio::fs::read_dir(&self.media_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some((stem, ext)) = name.rsplit_once('.') {
                if ext != PARTIAL_SUFFIX {
                    found.insert(stem.to_string(), path.clone());
                }
            }
        }

        tracing::debug!("Indexed {} cached files", found.len());
        *self.lock_stems() = found;
        Ok(())
    }

    fn lock_stems(&self) -> std::sync::MutexGuard<'_, HashMap<String, PathBuf>> {
        self.stems.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A cached file with the same stem as `path` but another extension.
    async fn find_by_stem(&self, path: &Path) -> Result<Option<PathBuf>> {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return Ok(None);
        };
        let candidate = self.lock_stems().get(stem).cloned();
        match candidate {
            Some(existing) if tokio::fs::try_exists(&existing).await? => Ok(Some(existing)),
            _ => Ok(None),
        }
    }

    /// Path the cache uses for item `index` of a post that resolved to `count` URLs.
    pub fn entry_path(&self, post_id: u64, index: usize, url: &str, count: usize) -> Result<PathBuf> {
        let shortcode = shortcode_for(post_id)?;
        let extension = extension_from_url(url)?;
        Ok(self
            .media_dir
            .join(cache_file_name(&shortcode, index, count, &extension)))
    }

    /// Return the cached file for `(post_id, index)`, downloading `url` if absent.
    ///
    /// A failed download leaves no entry behind, so the next run retries it.
    pub async fn ensure(&self, post_id: u64, index: usize, url: &str, count: usize) -> Result<CachedFile> {
        let path = self.entry_path(post_id, index, url, count)?;
        let extension = extension_from_url(url)?;

        if tokio::fs::try_exists(&path).await? {
            tracing::debug!("Cache hit: {}", path.display());
            return Ok(CachedFile {
                path,
                extension,
                downloaded: false,
            });
        }

        if let Some(existing) = self.find_by_stem(&path).await? {
            tracing::debug!(
                "Cache hit under another extension: {} for {}",
                existing.display(),
                url
            );
            let extension = existing
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string();
            return Ok(CachedFile {
                path: existing,
                extension,
                downloaded: false,
            });
        }

        let partial = partial_path(&path);
        match self.fetcher.fetch(url, &partial).await {
            Ok(bytes) => {
                tokio::fs::rename(&partial, &path).await?;
                tracing::debug!("Downloaded {} bytes to {}", bytes, path.display());
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    self.lock_stems().insert(stem.to_string(), path.clone());
                }
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(match e {
                    Error::Download(_) => e,
                    other => Error::Download(format!("{}: {}", url, other)),
                });
            }
        }

        Ok(CachedFile {
            path,
            extension,
            downloaded: true,
        })
    }

    /// Write the post's raw metadata to `.JSON/<shortcode>.json`, replacing any
    /// earlier copy.
    pub async fn write_metadata(&self, post: &Post) -> Result<PathBuf> {
        let shortcode = shortcode_for(post.id)?;
        let path = self.metadata_dir.join(sidecar_file_name(&shortcode));

        let sidecar = Sidecar {
            id: post.id,
            url: id_to_url(post.id),
            owner: &post.owner_username,
            synced_at: Utc::now().to_rfc3339(),
            media: &post.raw,
        };

        let content = serde_json::to_vec_pretty(&sidecar)?;
        tokio::fs::write(&path, content).await?;
        Ok(path)
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}
