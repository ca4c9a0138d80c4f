//! Configuration validation logic.

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Minimum length for a session id.
const MIN_SESSION_ID_LENGTH: usize = 10;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_username(&config.account.username)?;
    validate_session_id(&config.account.session_id)?;
    validate_collection_names(&config.options.collections)?;
    validate_page_delay(config.options.page_delay_min_ms, config.options.page_delay_max_ms)?;

    Ok(())
}

/// Validate the account username.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(Error::MissingConfig("username".to_string()));
    }

    // Username pattern: 1-30 chars, letters, digits, periods, underscores
    let username_pattern =
        Regex::new(r"^[A-Za-z0-9._]{1,30}$").map_err(|e| Error::Config(e.to_string()))?;

    let clean_username = username.trim_start_matches('@');
    if !username_pattern.is_match(clean_username) {
        return Err(Error::ConfigValidation {
            field: "username".to_string(),
            message: format!(
                "Username '{}' is invalid. Use 1-30 letters, digits, periods or underscores.",
                username
            ),
        });
    }

    let lower = clean_username.to_lowercase();
    if lower == "replaceme" || lower == "username" || lower == "your_username" {
        return Err(Error::ConfigValidation {
            field: "username".to_string(),
            message: "Username appears to be a placeholder.".to_string(),
        });
    }

    Ok(())
}

/// Validate the session id.
pub fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.is_empty() {
        return Err(Error::MissingConfig(
            "session_id (the 'sessionid' cookie of a logged-in browser)".to_string(),
        ));
    }

    if session_id.len() < MIN_SESSION_ID_LENGTH {
        return Err(Error::ConfigValidation {
            field: "session_id".to_string(),
            message: format!(
                "Session id must be at least {} characters (got {})",
                MIN_SESSION_ID_LENGTH,
                session_id.len()
            ),
        });
    }

    let lower = session_id.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_session") {
        return Err(Error::ConfigValidation {
            field: "session_id".to_string(),
            message: "Session id appears to be a placeholder.".to_string(),
        });
    }

    Ok(())
}

/// Validate requested collection names.
pub fn validate_collection_names<S: AsRef<str>>(names: &[S]) -> Result<()> {
    if let Some(blank) = names.iter().find(|n| n.as_ref().trim().is_empty()) {
        return Err(Error::ConfigValidation {
            field: "collections".to_string(),
            message: format!("Collection name '{}' is blank", blank.as_ref()),
        });
    }

    Ok(())
}

/// Validate the page delay bounds.
pub fn validate_page_delay(min_ms: u64, max_ms: u64) -> Result<()> {
    if min_ms > max_ms {
        return Err(Error::ConfigValidation {
            field: "page_delay_min_ms".to_string(),
            message: format!(
                "Minimum page delay ({} ms) exceeds maximum ({} ms)",
                min_ms, max_ms
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert!(validate_username("valid_user123").is_ok());
        assert!(validate_username("user.name").is_ok());
        assert!(validate_username("@someone").is_ok());
    }

    #[test]
    fn test_invalid_username() {
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("dash-not-allowed").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("replaceme").is_err());
    }

    #[test]
    fn test_session_id() {
        assert!(validate_session_id("1234567%3AabcDEF%3A12").is_ok());
        assert!(matches!(validate_session_id(""), Err(Error::MissingConfig(_))));
        assert!(validate_session_id("short").is_err());
        assert!(validate_session_id("REPLACEME_REPLACEME").is_err());
    }

    #[test]
    fn test_collection_names() {
        assert!(validate_collection_names(&["Travel", "Food"]).is_ok());
        assert!(validate_collection_names::<&str>(&[]).is_ok());
        assert!(validate_collection_names(&["Travel", "  "]).is_err());
    }

    #[test]
    fn test_page_delay() {
        assert!(validate_page_delay(3000, 5000).is_ok());
        assert!(validate_page_delay(0, 0).is_ok());
        assert!(validate_page_delay(5000, 3000).is_err());
    }

    #[test]
    fn test_validate_config() {
        let mut config = Config::default();
        assert!(validate_config(&config).is_err());

        config.account.username = "someone".into();
        config.account.session_id = "1234567%3AabcDEF%3A12".into();
        assert!(validate_config(&config).is_ok());

        config.options.page_delay_min_ms = 10_000;
        assert!(validate_config(&config).is_err());
    }
}
