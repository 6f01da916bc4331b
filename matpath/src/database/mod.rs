//! `SQLite` reference store for hierarchy-indexed records.
//!
//! This module provides a single-table store implementing
//! [`RecordStore`](crate::RecordStore): connection management, schema
//! versioning, predicate-to-SQL translation and transactional subtree moves.
//!
//! # Examples
//!
//! ```
//! use matpath::database::Database;
//! use matpath::{Hierarchical, Hierarchy, Record};
//! use serde_json::json;
//!
//! let mut db = Database::open_in_memory().unwrap();
//!
//! let mut root = Record::new(json!("root"));
//! db.save(&mut root).unwrap();
//!
//! let mut leaf = Record::new(json!("leaf"));
//! leaf.set_parent(Some(&root)).unwrap();
//! db.save(&mut leaf).unwrap();
//!
//! let children = db.children(&root).unwrap();
//! assert_eq!(children.len(), 1);
//! assert_eq!(children[0].path(), "1");
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
#[cfg(test)]
pub(crate) mod test_util;
mod transaction;

pub use config::{
    default_data_dir, resolve_database_path, DatabaseConfig, DEFAULT_DATABASE_FILE,
    DEFAULT_DATA_DIR_NAME,
};
pub use connection::Database;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
pub use schema::CURRENT_SCHEMA_VERSION;
