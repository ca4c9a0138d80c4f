//! Domain representation of saved posts and their media.

use std::fmt;

/// One rendition of an image or video, as offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaVersion {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl MediaVersion {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }
}

/// The media attached to a post.
///
/// Versions are ordered by the platform, highest quality first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRecord {
    Image {
        versions: Vec<MediaVersion>,
    },
    Video {
        versions: Vec<MediaVersion>,
        /// Cover frames the platform sends alongside a video.
        thumbnails: Vec<MediaVersion>,
    },
    Carousel {
        children: Vec<MediaRecord>,
    },
}

impl MediaRecord {
    /// Short label used in log output.
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaRecord::Image { .. } => MediaKind::Image,
            MediaRecord::Video { .. } => MediaKind::Video,
            MediaRecord::Carousel { .. } => MediaKind::Carousel,
        }
    }
}

/// Variant tag of a [`MediaRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Carousel,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Carousel => write!(f, "carousel"),
        }
    }
}

/// A saved post.
#[derive(Debug, Clone)]
pub struct Post {
    /// Remote numeric identifier; the basis of every local filename.
    pub id: u64,

    pub owner_username: String,

    pub media: MediaRecord,

    /// The item exactly as the platform returned it, kept for the sidecar.
    pub raw: serde_json::Value,
}

impl Post {
    pub fn new(id: u64, owner_username: impl Into<String>, media: MediaRecord) -> Self {
        Self {
            id,
            owner_username: owner_username.into(),
            media,
            raw: serde_json::Value::Null,
        }
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }
}
