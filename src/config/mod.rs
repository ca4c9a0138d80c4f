//! Configuration module for igsync.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Credential lookup in `.netrc`
//! - Configuration validation

pub mod credentials;
pub mod loader;
pub mod validation;

pub use credentials::{fill_from_netrc, NETRC_MACHINE};
pub use loader::{AccountConfig, Config, OptionsConfig};
pub use validation::validate_config;
