//! Conversion between numeric post ids and their public shortcodes.
//!
//! A shortcode is the post id written in base 64 with the alphabet
//! `A-Z a-z 0-9 - _`, most significant symbol first.

use crate::error::{Error, Result};

/// Public base path of post pages.
pub const POST_URL_PREFIX: &str = "https://www.instagram.com/p";

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Encode a post id as its shortcode.
///
/// `0` encodes to the empty string; callers treat it as an invalid id.
pub fn encode(mut id: u64) -> String {
    let mut symbols = Vec::new();
    while id > 0 {
        symbols.push(ALPHABET[(id % 64) as usize]);
        id /= 64;
    }
    symbols.reverse();
    // Every byte comes from ALPHABET, which is ASCII.
    symbols.into_iter().map(char::from).collect()
}

/// Decode a shortcode back into a post id.
///
/// Returns `None` for an empty code, a symbol outside the alphabet, or a value
/// that does not fit in a `u64`.
pub fn decode(code: &str) -> Option<u64> {
    if code.is_empty() {
        return None;
    }

    code.bytes().try_fold(0u64, |acc, symbol| {
        let digit = ALPHABET.iter().position(|&c| c == symbol)? as u64;
        acc.checked_mul(64)?.checked_add(digit)
    })
}

/// Public URL of a post page.
pub fn id_to_url(id: u64) -> String {
    format!("{}/{}", POST_URL_PREFIX, encode(id))
}

/// Shortcode of a post, rejecting the degenerate id `0`.
pub fn shortcode_for(id: u64) -> Result<String> {
    if id == 0 {
        return Err(Error::InvalidMediaId("0".to_string()));
    }
    Ok(encode(id))
}

/// Parse a raw media identifier.
///
/// The platform sends ids as `"<mediaId>_<ownerId>"`; only the media part
/// identifies the post, so the owner suffix is dropped.
pub fn parse_media_id(raw: &str) -> Result<u64> {
    let media_part = raw.trim().split('_').next().unwrap_or_default();

    match media_part.parse::<u64>() {
        Ok(0) | Err(_) => Err(Error::InvalidMediaId(raw.to_string())),
        Ok(id) => Ok(id),
    }
}
