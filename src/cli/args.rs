//! Command-line argument definitions using clap.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::Config;

/// Instagram saved-collection sync CLI.
#[derive(Parser, Debug)]
#[command(
    name = "igsync",
    version,
    about = "Mirror your saved Instagram collections to a local folder",
    long_about = "Downloads every post saved in your Instagram collections into a single \
                  media store and links each file into one folder per collection.\n\n\
                  A post saved in several collections is downloaded once."
)]
pub struct Args {
    /// Instagram username of the logged-in account.
    #[arg(short, long, env = "IG_USERNAME")]
    pub username: Option<String>,

    /// Value of the browser's `sessionid` cookie.
    #[arg(short, long = "session-id", env = "IG_SESSION_ID", hide_env_values = true)]
    pub session_id: Option<String>,

    /// Root directory of the local store.
    #[arg(short = 'd', long = "directory")]
    pub storage_directory: Option<PathBuf>,

    /// Collection name(s) to sync. Syncs all collections when omitted.
    #[arg(short, long, num_args = 1..)]
    pub collections: Option<Vec<String>>,

    /// Path to configuration file.
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,

    /// `.netrc` to read missing credentials from (default: ~/.netrc).
    #[arg(long, value_name = "PATH")]
    pub netrc: Option<PathBuf>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent")]
    pub user_agent: Option<String>,

    /// Don't write .JSON metadata sidecars.
    #[arg(long)]
    pub no_metadata: bool,

    /// Hide per-file download information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Minimum delay between feed pages, in milliseconds.
    #[arg(long = "delay-min")]
    pub delay_min_ms: Option<u64>,

    /// Maximum delay between feed pages, in milliseconds.
    #[arg(long = "delay-max")]
    pub delay_max_ms: Option<u64>,

    /// Print the remote collection names and exit.
    #[arg(long)]
    pub list_collections: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log filter implied by the verbosity flag.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(username) = self.username {
            config.account.username = username;
        }

        if let Some(session_id) = self.session_id {
            config.account.session_id = session_id;
        }

        if let Some(dir) = self.storage_directory {
            config.options.storage_directory = Some(dir);
        }

        if let Some(collections) = self.collections {
            config.options.collections = collections;
        }

        if let Some(user_agent) = self.user_agent {
            config.options.user_agent = user_agent;
        }

        if let Some(min) = self.delay_min_ms {
            config.options.page_delay_min_ms = min;
        }

        if let Some(max) = self.delay_max_ms {
            config.options.page_delay_max_ms = max;
        }

        // Boolean flags (only override if set to non-default)
        if self.no_metadata {
            config.options.save_metadata = false;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}
