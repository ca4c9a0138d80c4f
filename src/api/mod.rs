//! Remote platform module.
//!
//! This module provides:
//! - The `RemotePlatform` contract the sync engine runs against
//! - HTTP client for the Instagram private API
//! - API response types and their conversion into posts

pub mod client;
pub mod platform;
pub mod types;

pub use client::InstagramApi;
pub use platform::{Collection, CollectionId, Credentials, FeedPage, RemotePlatform, Session};
