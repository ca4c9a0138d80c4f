//! Filesystem module.
//!
//! Provides:
//! - Store layout and directory management
//! - Filename generation and escaping
//! - The media cache and sidecar metadata
//! - Collection links into the cache

pub mod cache;
pub mod link;
pub mod naming;
pub mod paths;

pub use cache::{CachedFile, ContentCache};
pub use link::{ensure_link, LinkOutcome};
pub use naming::{cache_file_name, escape_collection_name, extension_from_url};
pub use paths::{ensure_dir, StoreLayout};
