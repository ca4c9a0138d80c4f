//! igsync - mirror saved Instagram collections to a local folder
//!
//! Every saved post is downloaded once into a shared media store and then
//! linked into one directory per collection, so a post saved in several
//! collections costs a single download and a single copy on disk.
//!
//! # Features
//!
//! - Sync all collections or a named subset
//! - Cursor-paginated collection feeds with jittered page delays
//! - Image, video and carousel posts (videos preferred over stills)
//! - Hard links into collection folders, symbolic links as a fallback
//! - Optional JSON metadata sidecars
//! - Re-runs download nothing that is already cached
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use igsync::api::{Credentials, RemotePlatform};
//! use igsync::download::{sync_collections, CollectionSelection, JitteredDelay, SyncContext};
//! use igsync::fs::{ContentCache, StoreLayout};
//! use igsync::InstagramApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(InstagramApi::new("Mozilla/5.0".into())?);
//!     let session = api
//!         .login(&Credentials {
//!             username: "someone".into(),
//!             secret: "sessionid-cookie".into(),
//!         })
//!         .await?;
//!     let collections = api.list_collections(&session).await?;
//!
//!     let layout = StoreLayout::new("/tmp/ig");
//!     let cache = ContentCache::new(&layout, api.clone());
//!     cache.prepare().await?;
//!
//!     let pacing = JitteredDelay::default();
//!     let ctx = SyncContext {
//!         platform: api.as_ref(),
//!         session: &session,
//!         cache: &cache,
//!         pacing: &pacing,
//!         save_metadata: true,
//!         show_downloads: true,
//!     };
//!     let report = sync_collections(&ctx, &layout, &collections, &CollectionSelection::all()).await;
//!     println!("{} files downloaded", report.files_downloaded());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::{Collection, InstagramApi, RemotePlatform};
pub use config::Config;
pub use download::{sync_collections, CollectionSelection, RunReport};
pub use error::{Error, Result};
pub use media::{MediaRecord, Post};
