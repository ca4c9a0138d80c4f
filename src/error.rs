//! Error types for the igsync application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Remote platform errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(String),

    // Per-item errors
    #[error("Post {post_id} exposes no downloadable image or video")]
    UnresolvableMedia { post_id: u64 },

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Could not link {}: {source}", path.display())]
    Link {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Identifier and filename errors
    #[error("Invalid media id: {0}")]
    InvalidMediaId(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
///
/// Per-collection failures are reported and still exit with `SUCCESS`; only
/// failures that leave nothing to sync produce a nonzero status.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const AUTH_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const API_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
