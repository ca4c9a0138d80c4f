//! Media module for post representation, shortcodes and URL resolution.

pub mod post;
pub mod resolver;
pub mod shortcode;

pub use post::{MediaKind, MediaRecord, MediaVersion, Post};
pub use resolver::{resolve, resolve_post};
pub use shortcode::{id_to_url, parse_media_id, shortcode_for};
