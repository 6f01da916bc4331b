//! Error types for the matpath library.
//!
//! This module provides the error hierarchy for path parsing, tree assembly,
//! subtree rewrites and the bundled record store, using `thiserror` for
//! ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a matpath error.
///
/// # Examples
///
/// ```
/// use matpath::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the matpath library.
#[derive(Debug, Error)]
pub enum Error {
    /// A path string could not be parsed as dot-separated record ids.
    #[error("malformed path '{input}': {reason}")]
    Format {
        /// The offending path string.
        input: String,
        /// Why the string was rejected.
        reason: String,
    },

    /// An index path element was not a positive record id.
    #[error("invalid index {value}: {reason}")]
    InvalidIndex {
        /// The rejected value.
        value: i64,
        /// Why the value was rejected.
        reason: String,
    },

    /// A record was assigned a parent that cannot act as one.
    #[error("invalid parent: {reason}")]
    InvalidParent {
        /// Why the parent was rejected.
        reason: String,
    },

    /// Stored paths do not describe a consistent tree.
    #[error("hierarchy integrity violated: {details}")]
    Integrity {
        /// Details about the inconsistency.
        details: String,
    },

    /// A record would become its own ancestor.
    #[error("record {record} cannot be moved under '{parent_path}': it would become its own ancestor")]
    Cycle {
        /// The record being moved.
        record: i64,
        /// The path of the requested parent position.
        parent_path: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A record payload could not be encoded or decoded.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The database file does not exist and auto-initialization is disabled.
    #[error("database not found: {}", path.display())]
    DatabaseNotFound {
        /// The expected path to the database file.
        path: PathBuf,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl From<crate::path::InvalidIndexError> for Error {
    fn from(err: crate::path::InvalidIndexError) -> Self {
        Self::InvalidIndex {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl Error {
    /// Shorthand for a [`Error::Format`] on `input`.
    pub(crate) fn format(input: &str, reason: impl Into<String>) -> Self {
        Self::Format {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if the error reports corrupt or inconsistent hierarchy data.
    ///
    /// # Examples
    ///
    /// ```
    /// use matpath::Error;
    ///
    /// let err = Error::Integrity { details: "2 records left unconsumed".into() };
    /// assert!(err.is_integrity());
    /// ```
    #[must_use]
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }

    /// Check if the error was caused by a malformed path string.
    ///
    /// # Examples
    ///
    /// ```
    /// use matpath::IndexPath;
    ///
    /// let err = IndexPath::parse("1.x").unwrap_err();
    /// assert!(err.is_format());
    /// ```
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
