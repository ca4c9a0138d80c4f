//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Folder created under the user's pictures directory by default.
const DEFAULT_STORE_FOLDER: &str = "InstagramCollections";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Account credentials configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Instagram username.
    #[serde(default)]
    pub username: String,

    /// Value of the `sessionid` cookie of a logged-in browser session.
    #[serde(default)]
    pub session_id: String,
}

/// Sync options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Root of the local store.
    #[serde(default)]
    pub storage_directory: Option<PathBuf>,

    /// Collections to sync; empty means all.
    #[serde(default)]
    pub collections: Vec<String>,

    /// Whether to write `.JSON` metadata sidecars.
    #[serde(default = "default_true")]
    pub save_metadata: bool,

    /// Whether to log every downloaded file.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Lower bound of the delay between feed pages.
    #[serde(default = "default_page_delay_min")]
    pub page_delay_min_ms: u64,

    /// Upper bound of the delay between feed pages.
    #[serde(default = "default_page_delay_max")]
    pub page_delay_max_ms: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            storage_directory: None,
            collections: Vec::new(),
            save_metadata: true,
            show_downloads: true,
            page_delay_min_ms: default_page_delay_min(),
            page_delay_max_ms: default_page_delay_max(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36".to_string()
}

fn default_true() -> bool {
    true
}

fn default_page_delay_min() -> u64 {
    3000
}

fn default_page_delay_max() -> u64 {
    5000
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective storage directory.
    ///
    /// Falls back to `<Pictures>/InstagramCollections`, then to the current
    /// directory when the platform has no pictures folder.
    pub fn storage_directory(&self) -> PathBuf {
        if let Some(dir) = &self.options.storage_directory {
            return dir.clone();
        }

        UserDirs::new()
            .and_then(|dirs| dirs.picture_dir().map(|p| p.join(DEFAULT_STORE_FOLDER)))
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}
