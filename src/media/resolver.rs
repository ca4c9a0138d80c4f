//! Resolution of a post's media into downloadable URLs.

use crate::error::{Error, Result};
use crate::media::post::{MediaRecord, MediaVersion, Post};

/// Resolve the ordered list of URLs to download for a post.
///
/// Images and videos yield one URL, carousels one URL per child.
pub fn resolve_post(post: &Post) -> Result<Vec<String>> {
    resolve(&post.media).ok_or(Error::UnresolvableMedia { post_id: post.id })
}

/// Resolve a media record, or `None` if it carries nothing downloadable.
///
/// Video is checked before image data so that a video post never resolves to
/// its cover frame. Carousel children contribute only their first URL, even
/// when a child is itself a carousel.
///
/// Dropping the rest of a nested carousel may well be a latent bug. It is
/// kept on purpose: the item indices in cached filenames depend on it, so
/// changing it would re-download and rename existing stores.
pub fn resolve(media: &MediaRecord) -> Option<Vec<String>> {
    match media {
        MediaRecord::Video { versions, .. } => first_url(versions),
        MediaRecord::Image { versions } => first_url(versions),
        MediaRecord::Carousel { children } => {
            if children.is_empty() {
                return None;
            }
            children
                .iter()
                .map(|child| resolve(child)?.into_iter().next())
                .collect()
        }
    }
}

fn first_url(versions: &[MediaVersion]) -> Option<Vec<String>> {
    versions.first().map(|v| vec![v.url.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str) -> MediaRecord {
        MediaRecord::Image {
            versions: vec![
                MediaVersion::new(url, 1080, 1080),
                MediaVersion::new("https://cdn.example/small.jpg", 240, 240),
            ],
        }
    }

    fn video(url: &str) -> MediaRecord {
        MediaRecord::Video {
            versions: vec![MediaVersion::new(url, 720, 1280)],
            thumbnails: vec![MediaVersion::new("https://cdn.example/cover.jpg", 720, 1280)],
        }
    }

    #[test]
    fn test_image_takes_first_candidate() {
        assert_eq!(
            resolve(&image("https://cdn.example/a.jpg")),
            Some(vec!["https://cdn.example/a.jpg".to_string()])
        );
    }

    #[test]
    fn test_video_wins_over_cover_image() {
        assert_eq!(
            resolve(&video("https://cdn.example/v.mp4")),
            Some(vec!["https://cdn.example/v.mp4".to_string()])
        );
    }

    #[test]
    fn test_carousel_yields_one_url_per_child() {
        let carousel = MediaRecord::Carousel {
            children: vec![
                image("https://cdn.example/1.jpg"),
                video("https://cdn.example/2.mp4"),
                image("https://cdn.example/3.jpg"),
            ],
        };

        assert_eq!(
            resolve(&carousel).unwrap(),
            vec![
                "https://cdn.example/1.jpg",
                "https://cdn.example/2.mp4",
                "https://cdn.example/3.jpg",
            ]
        );
    }

    #[test]
    fn test_nested_carousel_contributes_first_url_only() {
        let nested = MediaRecord::Carousel {
            children: vec![
                MediaRecord::Carousel {
                    children: vec![
                        image("https://cdn.example/inner-1.jpg"),
                        image("https://cdn.example/inner-2.jpg"),
                    ],
                },
                image("https://cdn.example/outer.jpg"),
            ],
        };

        assert_eq!(
            resolve(&nested).unwrap(),
            vec!["https://cdn.example/inner-1.jpg", "https://cdn.example/outer.jpg"]
        );
    }

    #[test]
    fn test_empty_media_is_unresolvable() {
        let post = Post::new(7, "someone", MediaRecord::Image { versions: vec![] });
        assert!(matches!(
            resolve_post(&post),
            Err(Error::UnresolvableMedia { post_id: 7 })
        ));

        let empty_video = MediaRecord::Video {
            versions: vec![],
            thumbnails: vec![MediaVersion::new("https://cdn.example/cover.jpg", 1, 1)],
        };
        assert_eq!(resolve(&empty_video), None);
        assert_eq!(resolve(&MediaRecord::Carousel { children: vec![] }), None);
    }

    #[test]
    fn test_carousel_with_unresolvable_child_fails() {
        let carousel = MediaRecord::Carousel {
            children: vec![
                image("https://cdn.example/1.jpg"),
                MediaRecord::Image { versions: vec![] },
            ],
        };
        assert_eq!(resolve(&carousel), None);
    }
}
