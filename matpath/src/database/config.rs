//! Database configuration and connection parameters.
//!
//! This module provides configuration types for database connections,
//! including path resolution and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// File name of the database inside the data directory.
pub const DEFAULT_DATABASE_FILE: &str = "matpath.db";

/// Name of the data directory under the user's home.
pub const DEFAULT_DATA_DIR_NAME: &str = ".matpath";

/// Configuration for database connections.
///
/// # Examples
///
/// ```
/// use matpath::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/matpath.db")
///     .with_busy_timeout(Duration::from_secs(10));
/// assert!(config.auto_create);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long a writer waits for the lock before giving up.
    pub busy_timeout: Duration,
    /// Whether to create the database if it doesn't exist.
    pub auto_create: bool,
    /// Whether to open the database in read-only mode.
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Creates a configuration with a 5 second busy timeout, auto-creation
    /// enabled and write access.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_secs(5),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout duration.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Refuses to create a missing database file.
    #[must_use]
    pub fn without_auto_create(mut self) -> Self {
        self.auto_create = false;
        self
    }

    /// Configures the database to be opened in read-only mode.
    ///
    /// When read-only is enabled, `auto_create` is automatically disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use matpath::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/matpath.db").read_only();
    /// assert!(config.read_only);
    /// assert!(!config.auto_create);
    /// ```
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory, `~/.matpath`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(DEFAULT_DATA_DIR_NAME))
        .ok_or_else(|| Error::Validation {
            field: "home_directory".into(),
            message: "Cannot determine home directory".into(),
        })
}

/// Resolves the database path using environment variables or defaults.
///
/// The resolution order is:
/// 1. `$MATPATH_DATA_DIR/matpath.db` if `MATPATH_DATA_DIR` is set
/// 2. `~/.matpath/matpath.db` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined and
/// `MATPATH_DATA_DIR` is not set.
pub fn resolve_database_path() -> Result<PathBuf> {
    let data_dir = match std::env::var_os("MATPATH_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => default_data_dir()?,
    };
    Ok(data_dir.join(DEFAULT_DATABASE_FILE))
}
