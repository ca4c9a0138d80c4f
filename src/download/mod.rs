//! Download module for collection syncing.
//!
//! This module provides:
//! - Media file transfer
//! - Page delay policies
//! - Per-collection pagination and item processing
//! - Collection selection and the sequential run over collections
//! - Sync statistics

pub mod collection;
pub mod fetch;
pub mod pacing;
pub mod state;
pub mod sync;

pub use collection::{sync_collection, SyncContext};
pub use fetch::MediaFetcher;
pub use pacing::{DelayPolicy, JitteredDelay, NoDelay};
pub use state::{CollectionFailure, CollectionState, RunReport};
pub use sync::{sync_collections, CollectionSelection, DirectoryClaims};
