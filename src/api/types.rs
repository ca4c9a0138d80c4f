//! API response type definitions.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::media::{parse_media_id, MediaRecord, MediaVersion, Post};

/// Media type codes used by the platform.
pub const MEDIA_TYPE_IMAGE: i64 = 1;
pub const MEDIA_TYPE_VIDEO: i64 = 2;
pub const MEDIA_TYPE_CAROUSEL: i64 = 8;

/// Identifier that may arrive as a JSON number or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Number(u64),
    Text(String),
}

impl FlexibleId {
    pub fn into_string(self) -> String {
        match self {
            FlexibleId::Number(n) => n.to_string(),
            FlexibleId::Text(s) => s,
        }
    }
}

/// Status envelope shared by every endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }

    pub fn requires_login(&self) -> bool {
        matches!(
            self.message.as_deref(),
            Some("login_required") | Some("checkpoint_required") | Some("challenge_required")
        )
    }
}

/// Response of the current-user endpoint.
#[derive(Debug, Deserialize)]
pub struct CurrentUserResponse {
    pub user: WireUser,
}

/// Account summary attached to users and media.
#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    pub pk: Option<FlexibleId>,
    pub username: String,
}

/// Response of the collection listing endpoint.
#[derive(Debug, Deserialize)]
pub struct CollectionsResponse {
    #[serde(default)]
    pub items: Vec<WireCollection>,
    #[serde(default)]
    pub more_available: bool,
    pub next_max_id: Option<FlexibleId>,
}

/// A collection entry in the listing.
#[derive(Debug, Clone, Deserialize)]
pub struct WireCollection {
    pub collection_id: FlexibleId,
    pub collection_name: String,
}

/// Response of the collection feed endpoint.
///
/// Items stay untyped so the raw JSON can be written to the sidecar and a
/// single malformed item does not fail the whole page.
#[derive(Debug, Deserialize)]
pub struct CollectionFeedResponse {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    #[serde(default)]
    pub more_available: bool,
    pub next_max_id: Option<FlexibleId>,
}

impl CollectionFeedResponse {
    /// Cursor for the next page, if the platform says there is one.
    pub fn next_cursor(&self) -> Option<String> {
        if !self.more_available {
            return None;
        }
        self.next_max_id.clone().map(FlexibleId::into_string)
    }
}

/// Media object as sent by the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMedia {
    pub pk: Option<FlexibleId>,
    pub id: Option<String>,
    #[serde(default)]
    pub media_type: i64,
    pub image_versions2: Option<ImageVersions>,
    #[serde(default)]
    pub video_versions: Vec<WireVersion>,
    #[serde(default)]
    pub carousel_media: Vec<WireMedia>,
    pub user: Option<WireUser>,
}

/// Wrapper around image candidates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageVersions {
    #[serde(default)]
    pub candidates: Vec<WireVersion>,
}

/// One rendition of an image or video.
#[derive(Debug, Clone, Deserialize)]
pub struct WireVersion {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl From<&WireVersion> for MediaVersion {
    fn from(v: &WireVersion) -> Self {
        MediaVersion::new(v.url.clone(), v.width, v.height)
    }
}

impl WireMedia {
    /// Numeric post id, from `pk` or else the media part of `id`.
    pub fn post_id(&self) -> Result<u64> {
        if let Some(pk) = &self.pk {
            return parse_media_id(&pk.clone().into_string());
        }
        match &self.id {
            Some(id) => parse_media_id(id),
            None => Err(Error::InvalidMediaId("media without pk or id".to_string())),
        }
    }

    /// Convert into the domain media record.
    pub fn to_record(&self) -> MediaRecord {
        let candidates: Vec<MediaVersion> = self
            .image_versions2
            .as_ref()
            .map(|iv| iv.candidates.iter().map(MediaVersion::from).collect())
            .unwrap_or_default();

        if self.media_type == MEDIA_TYPE_CAROUSEL || !self.carousel_media.is_empty() {
            MediaRecord::Carousel {
                children: self.carousel_media.iter().map(WireMedia::to_record).collect(),
            }
        } else if self.media_type == MEDIA_TYPE_VIDEO || !self.video_versions.is_empty() {
            MediaRecord::Video {
                versions: self.video_versions.iter().map(MediaVersion::from).collect(),
                thumbnails: candidates,
            }
        } else {
            MediaRecord::Image {
                versions: candidates,
            }
        }
    }
}

/// Build a domain post from one feed item (`{"media": {...}}`).
pub fn parse_feed_item(item: &serde_json::Value) -> Result<Post> {
    let media_json = item.get("media").unwrap_or(item);
    let media: WireMedia = serde_json::from_value(media_json.clone())?;

    let owner = media
        .user
        .as_ref()
        .map(|u| u.username.clone())
        .unwrap_or_default();

    Ok(Post::new(media.post_id()?, owner, media.to_record()).with_raw(media_json.clone()))
}
