//! Database connection management.
//!
//! This module provides the main database connection type with proper
//! initialization and PRAGMA settings for optimal `SQLite` configuration.

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;
use super::migrations;
use super::schema::CURRENT_SCHEMA_VERSION;

/// A `SQLite`-backed [`RecordStore`](crate::RecordStore).
///
/// # Examples
///
/// ```no_run
/// use matpath::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/matpath.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// This function will:
    /// - Create the parent directory if `auto_create` is enabled
    /// - Open the database with appropriate flags
    /// - Set WAL mode for concurrent access
    /// - Configure busy timeout
    /// - Initialize or verify the database schema
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseNotFound`] if the file is missing and
    /// `auto_create` is off, [`Error::UnsupportedSchemaVersion`] if the file
    /// holds another schema version, or an I/O or database error.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if !config.path.exists() {
            if !config.auto_create {
                return Err(Error::DatabaseNotFound {
                    path: config.path.clone(),
                });
            }
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;
        conn.busy_timeout(config.busy_timeout)?;

        if !config.read_only {
            // PRAGMA journal_mode returns a row, so it goes through query_row.
            let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        }

        Self::prepare_schema(&conn, &config)?;
        log::debug!("opened database at {}", config.path.display());

        Ok(Self { conn, config })
    }

    /// Opens a private in-memory database with a fresh schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    ///
    /// # Examples
    ///
    /// ```
    /// use matpath::database::Database;
    /// use matpath::{Hierarchy, Record};
    /// use serde_json::json;
    ///
    /// let mut db = Database::open_in_memory().unwrap();
    /// let mut record = Record::new(json!("first"));
    /// db.save(&mut record).unwrap();
    /// assert!(record.is_persisted());
    /// ```
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::initialize_schema(&conn)?;
        Ok(Self {
            conn,
            config: DatabaseConfig::new(":memory:"),
        })
    }

    fn prepare_schema(conn: &Connection, config: &DatabaseConfig) -> Result<()> {
        if !config.read_only {
            return migrations::check_schema_compatibility(conn);
        }
        match migrations::get_schema_version(conn)? {
            CURRENT_SCHEMA_VERSION => Ok(()),
            found => Err(Error::UnsupportedSchemaVersion {
                expected: CURRENT_SCHEMA_VERSION,
                found,
            }),
        }
    }

    /// Returns the configuration this database was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
