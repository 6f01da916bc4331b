#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # matpath
//!
//! A materialized-path hierarchy index for records kept in a flat store.
//!
//! Each record stores the ids of its ancestors as a dot-separated path. That
//! one column is enough to answer every navigation question with a single
//! predicate, to rebuild whole trees in one pass over sorted rows, and to
//! reparent a subtree with one bulk rewrite.
//!
//! ## Core Types
//!
//! - [`IndexPath`] and [`RecordId`]: parsed paths and their ordering
//! - [`Record`] and [`Hierarchical`]: records and their lifecycle hooks
//! - [`TreeAssembler`] and [`Tree`]: tree reconstruction
//! - [`PathChange`] and [`SubtreeRewriter`]: subtree moves
//! - [`HierarchyQuery`] and [`Predicate`]: store-independent lookups
//! - [`RecordStore`] and [`Hierarchy`]: the storage seam and the navigation
//!   API on top of it
//! - [`Database`]: the bundled `SQLite` store
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use matpath::{Database, Hierarchical, Hierarchy, Record, RecordStore};
//! use serde_json::json;
//!
//! let mut db = Database::open_in_memory().unwrap();
//!
//! let mut a = Record::new(json!("a"));
//! let mut b = Record::new(json!("b"));
//! db.save(&mut a).unwrap();
//! db.save(&mut b).unwrap();
//!
//! let mut leaf = Record::new(json!("leaf"));
//! leaf.set_parent(Some(&a)).unwrap();
//! db.save(&mut leaf).unwrap();
//!
//! // Moving `a` under `b` carries its subtree along.
//! a.set_parent(Some(&b)).unwrap();
//! assert_eq!(db.save(&mut a).unwrap(), 1);
//!
//! let leaf = db.get(leaf.id().unwrap()).unwrap().unwrap();
//! assert_eq!(leaf.path(), "2.1");
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod path;
pub mod query;
pub mod record;
pub mod rewrite;
pub mod store;
pub mod tree;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use path::{IndexPath, InvalidIndexError, RecordId};
pub use query::{order_ancestors, HierarchyQuery, Predicate, QueryOrder};
pub use record::{Hierarchical, Record};
pub use rewrite::{PathChange, SubtreeRewriter};
pub use store::{Hierarchy, RecordStore};
pub use tree::{NodeId, Tree, TreeAssembler, TreeNode};
