//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `MATPATH_*` environment variables that
//! override configuration file values.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::logging::{LogLevel, LOG_MODE_ENV};
use std::env;
use std::path::PathBuf;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use matpath::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., a non-numeric timeout or an unrecognized boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(dir) = env::var_os("MATPATH_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(file) = env::var("MATPATH_DATABASE_FILE") {
            config.database_file = Some(file);
        }

        if let Ok(seconds) = env::var("MATPATH_MAXIMUM_LOCK_WAIT_SECONDS") {
            config.maximum_lock_wait_seconds =
                Some(seconds.parse().map_err(|_| Error::Validation {
                    field: "MATPATH_MAXIMUM_LOCK_WAIT_SECONDS".into(),
                    message: "Must be a positive integer".into(),
                })?);
        }

        if let Ok(val) = env::var("MATPATH_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("MATPATH_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(val) = env::var("MATPATH_READ_ONLY") {
            config.read_only = Some(Self::parse_bool("MATPATH_READ_ONLY", &val)?);
        }

        if let Ok(val) = env::var(LOG_MODE_ENV) {
            config.log_mode = Some(LogLevel::parse(&val).map_err(|message| Error::Validation {
                field: LOG_MODE_ENV.into(),
                message,
            })?);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
