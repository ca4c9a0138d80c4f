//! Credential lookup in `.netrc`.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use netrc::Netrc;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Machine entry holding the account credentials.
pub const NETRC_MACHINE: &str = "instagram.com";

/// `.netrc` in the user's home directory.
pub fn default_netrc_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".netrc"))
}

/// Login and password of one `.netrc` entry.
#[derive(Clone, PartialEq, Eq)]
pub struct NetrcEntry {
    pub login: String,
    pub password: Option<String>,
}

impl fmt::Debug for NetrcEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetrcEntry")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Read the entry for `machine`, falling back to the `default` entry.
pub fn read_netrc(path: &Path, machine: &str) -> Result<Option<NetrcEntry>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Config(format!("netrc file not found: {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;

    let parsed = Netrc::parse(BufReader::new(file))
        .map_err(|e| Error::Config(format!("Failed to parse {}: {:?}", path.display(), e)))?;

    let machine_entry = parsed
        .hosts
        .into_iter()
        .find(|(host, _)| host == machine)
        .map(|(_, entry)| entry);

    Ok(machine_entry.or(parsed.default).map(|entry| NetrcEntry {
        login: entry.login,
        password: entry.password,
    }))
}

/// Fill a missing username or session id from `.netrc`.
///
/// `explicit` must name an existing file. Without it, `~/.netrc` is read when
/// present. The password is only taken when the entry's login matches the
/// configured username. Returns whether any field was filled.
pub fn fill_from_netrc(config: &mut Config, explicit: Option<&Path>) -> Result<bool> {
    let account = &mut config.account;
    if !account.username.is_empty() && !account.session_id.is_empty() {
        return Ok(false);
    }

    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_netrc_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(false),
        },
    };

    let Some(entry) = read_netrc(&path, NETRC_MACHINE)? else {
        tracing::debug!("No {} entry in {}", NETRC_MACHINE, path.display());
        return Ok(false);
    };

    let mut filled = false;

    if account.username.is_empty() && !entry.login.is_empty() {
        account.username = entry.login.clone();
        filled = true;
    }

    let same_account = account
        .username
        .trim_start_matches('@')
        .eq_ignore_ascii_case(&entry.login);

    if account.session_id.is_empty() && same_account {
        if let Some(password) = entry.password {
            account.session_id = password;
            filled = true;
        }
    }

    if filled {
        tracing::debug!("Filled credentials from {}", path.display());
    }
    Ok(filled)
}
