//! Cursor-driven sync of a single collection.

use std::path::Path;

use tokio::time::sleep;

use crate::api::{Collection, RemotePlatform, Session};
use crate::download::pacing::DelayPolicy;
use crate::download::state::CollectionState;
use crate::error::Result;
use crate::fs::{ensure_link, ContentCache, LinkOutcome};
use crate::media::{resolve_post, Post};

/// Everything a collection sync needs, borrowed for the duration of a run.
pub struct SyncContext<'a> {
    pub platform: &'a dyn RemotePlatform,
    pub session: &'a Session,
    pub cache: &'a ContentCache,
    pub pacing: &'a dyn DelayPolicy,
    /// Write the `.JSON` sidecar for every post.
    pub save_metadata: bool,
    pub show_downloads: bool,
}

/// Walk a collection feed from the first page to the last.
///
/// Items are processed in page order; per-item failures are logged, counted in
/// `state` and skipped. A failed page fetch aborts the collection and is
/// returned to the caller.
pub async fn sync_collection(
    ctx: &SyncContext<'_>,
    collection: &Collection,
    collection_dir: &Path,
    state: &mut CollectionState,
) -> Result<()> {
    tracing::info!("Syncing collection '{}'...", collection.name);

    let mut cursor: Option<String> = None;
    let mut first_page = true;

    loop {
        let delay = ctx.pacing.delay(first_page);
        if !delay.is_zero() {
            tracing::debug!("Waiting {:?} before next page", delay);
            sleep(delay).await;
        }

        let page = ctx
            .platform
            .fetch_collection_page(ctx.session, &collection.id, cursor.as_deref())
            .await?;
        state.pages_fetched += 1;
        first_page = false;

        tracing::debug!(
            "Page {} of '{}': {} posts, more: {}",
            state.pages_fetched,
            collection.name,
            page.items.len(),
            page.next_cursor.is_some()
        );

        for post in &page.items {
            process_post(ctx, collection_dir, post, state).await;
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::info!(
        "Collection '{}' done: {} posts, {} downloaded, {} already cached",
        collection.name,
        state.posts_seen,
        state.files_downloaded,
        state.cache_hits
    );

    Ok(())
}

/// Resolve, cache and link one post. Never fails the page.
async fn process_post(ctx: &SyncContext<'_>, collection_dir: &Path, post: &Post, state: &mut CollectionState) {
    state.posts_seen += 1;

    if ctx.save_metadata {
        if let Err(e) = ctx.cache.write_metadata(post).await {
            state.metadata_failures += 1;
            tracing::warn!("Failed to write metadata for post {}: {}", post.id, e);
        }
    }

    let urls = match resolve_post(post) {
        Ok(urls) => urls,
        Err(e) => {
            state.unresolvable += 1;
            tracing::warn!("Skipping post {} ({}): {}", post.id, post.media.kind(), e);
            return;
        }
    };

    let count = urls.len();
    for (index, url) in urls.iter().enumerate() {
        let cached = match ctx.cache.ensure(post.id, index, url, count).await {
            Ok(cached) => cached,
            Err(e) => {
                state.download_failures += 1;
                tracing::warn!("Failed to cache item {} of post {}: {}", index, post.id, e);
                continue;
            }
        };

        if cached.downloaded {
            state.files_downloaded += 1;
            if ctx.show_downloads {
                tracing::info!("Downloaded: {}", cached.path.display());
            }
        } else {
            state.cache_hits += 1;
        }

        match ensure_link(collection_dir, cached.file_name(), &cached).await {
            Ok(LinkOutcome::Existing) => state.links_existing += 1,
            Ok(outcome) => {
                state.links_created += 1;
                if outcome == LinkOutcome::SymLinked {
                    tracing::debug!("Symlinked {} into {}", cached.file_name(), collection_dir.display());
                }
            }
            Err(e) => {
                state.link_failures += 1;
                tracing::warn!("{}", e);
            }
        }
    }
}
