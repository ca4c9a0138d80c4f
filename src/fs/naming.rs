//! Filename generation and escaping.

use url::Url;

use crate::error::{Error, Result};

/// Extension used when a media URL has none.
pub const FALLBACK_EXTENSION: &str = "bin";

/// Escape a collection name into a single directory name.
///
/// Path separators and characters that are invalid on common filesystems are
/// replaced with `_`. A leading `.` is replaced too, so a collection can never
/// land in a hidden directory or on top of the store's own `.`-prefixed
/// directories, and `..` can never be produced.
pub fn escape_collection_name(name: &str) -> Result<String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(Error::InvalidFilename(
            "Collection name cannot be empty or whitespace-only".to_string(),
        ));
    }

    let escaped: String = trimmed
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            '.' if i == 0 => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    Ok(escaped)
}

/// Name of a cached media file.
///
/// The item index only appears when the post resolved to more than one URL.
pub fn cache_file_name(shortcode: &str, index: usize, count: usize, extension: &str) -> String {
    if count > 1 {
        format!("{}.{}.{}", shortcode, index, extension)
    } else {
        format!("{}.{}", shortcode, extension)
    }
}

/// Name of the metadata sidecar of a post.
pub fn sidecar_file_name(shortcode: &str) -> String {
    format!("{}.json", shortcode)
}

/// Lower-cased extension of a URL's path, ignoring query and fragment.
pub fn extension_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;

    let filename = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    let ext = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && is_plain_extension(ext) => ext.to_lowercase(),
        _ => FALLBACK_EXTENSION.to_string(),
    };

    Ok(ext)
}

fn is_plain_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}
