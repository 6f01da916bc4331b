//! Configuration schema definitions.
//!
//! Every field is optional so that layers can be merged: a `None` leaves the
//! value from a lower layer in place.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::database::{DatabaseConfig, DEFAULT_DATABASE_FILE};
use crate::error::Result;
use crate::logging::{LogLevel, Logger};

/// Busy timeout applied when `maximum_lock_wait_seconds` is unset.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Store and logging configuration.
///
/// # Examples
///
/// ```
/// use matpath::config::Config;
///
/// let config: Config = serde_yaml::from_str("database_file: tree.db\nread_only: true\n").unwrap();
/// assert_eq!(config.database_file.as_deref(), Some("tree.db"));
/// assert_eq!(config.read_only, Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the database and the user config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Database file name inside `data_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_file: Option<String>,

    /// How long a writer waits for the database lock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Refuse to create a missing database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_autoinit: Option<bool>,

    /// Open the database read-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    /// Stderr logging verbosity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_mode: Option<LogLevel>,
}

impl Config {
    /// Returns the data directory, falling back to `~/.matpath`.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the home
    /// directory cannot be determined.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::database::default_data_dir(),
        }
    }

    /// Returns the full database path.
    ///
    /// # Errors
    ///
    /// As [`Config::resolved_data_dir`].
    pub fn database_path(&self) -> Result<PathBuf> {
        let file = self.database_file.as_deref().unwrap_or(DEFAULT_DATABASE_FILE);
        Ok(self.resolved_data_dir()?.join(file))
    }

    /// Builds the connection parameters for [`Database::open`](crate::Database::open).
    ///
    /// # Errors
    ///
    /// As [`Config::resolved_data_dir`].
    ///
    /// # Examples
    ///
    /// ```
    /// use matpath::config::Config;
    /// use std::path::PathBuf;
    /// use std::time::Duration;
    ///
    /// let config = Config {
    ///     data_dir: Some(PathBuf::from("/var/lib/matpath")),
    ///     maximum_lock_wait_seconds: Some(30),
    ///     ..Default::default()
    /// };
    /// let db = config.database_config().unwrap();
    /// assert_eq!(db.path, PathBuf::from("/var/lib/matpath/matpath.db"));
    /// assert_eq!(db.busy_timeout, Duration::from_secs(30));
    /// ```
    pub fn database_config(&self) -> Result<DatabaseConfig> {
        let seconds = self
            .maximum_lock_wait_seconds
            .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS);
        let mut db = DatabaseConfig::new(self.database_path()?)
            .with_busy_timeout(Duration::from_secs(seconds));
        if self.disable_autoinit == Some(true) {
            db = db.without_auto_create();
        }
        if self.read_only == Some(true) {
            db = db.read_only();
        }
        Ok(db)
    }

    /// Builds a stderr logger at the configured verbosity.
    #[must_use]
    pub fn logger(&self) -> Logger {
        Logger::new(self.log_mode.unwrap_or(LogLevel::Normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.data_dir.is_none());
        assert!(config.log_mode.is_none());
        assert_eq!(config.logger().level(), LogLevel::Normal);
    }

    #[test]
    fn test_config_deny_unknown_fields() {
        let result: std::result::Result<Config, _> = serde_yaml::from_str("ports: 8080\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_complete_config() {
        let yaml = r"
data_dir: /srv/tree
database_file: nodes.db
maximum_lock_wait_seconds: 12
disable_autoinit: true
read_only: false
log_mode: verbose
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/tree")));
        assert_eq!(config.log_mode, Some(LogLevel::Verbose));

        let db = config.database_config().unwrap();
        assert_eq!(db.path, PathBuf::from("/srv/tree/nodes.db"));
        assert_eq!(db.busy_timeout, Duration::from_secs(12));
        assert!(!db.auto_create);
        assert!(!db.read_only);
    }

    #[test]
    fn test_read_only_database_config() {
        let config = Config {
            data_dir: Some(PathBuf::from("/srv/tree")),
            read_only: Some(true),
            ..Default::default()
        };
        let db = config.database_config().unwrap();
        assert!(db.read_only);
        assert!(!db.auto_create);
        assert_eq!(db.busy_timeout, Duration::from_secs(DEFAULT_LOCK_WAIT_SECONDS));
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let config = Config {
            database_file: Some("x.db".into()),
            ..Default::default()
        };
        assert_eq!(serde_yaml::to_string(&config).unwrap(), "database_file: x.db\n");
    }
}
