//! Materialized path values.
//!
//! Every record stores a path: the dot-separated ids of its ancestors, root
//! first. This module provides the parsed form of that value and the string
//! arithmetic the rest of the crate builds on.
//!
//! # Key Concepts
//!
//! ## Index paths
//!
//! [`IndexPath`] is the parsed, ordered sequence of ancestor ids. Its order
//! is lexicographic with shallower paths first, which makes
//! `(index_path, id)` a depth-first sort key.
//!
//! ## Own paths
//!
//! A record's own path (`my_path`) is its stored path followed by its id.
//! Children store exactly that value, so `children == path = my_path` and
//! `descendants == path within my_path`.
//!
//! # Examples
//!
//! ```
//! use matpath::path::{codec, IndexPath};
//! use matpath::RecordId;
//!
//! let stored = "5.9";
//! let ancestors = IndexPath::parse(stored).unwrap();
//! assert_eq!(ancestors.last().unwrap().value(), 9);
//!
//! let me = RecordId::try_from(12).unwrap();
//! let mine = codec::child_path(stored, me);
//! assert_eq!(mine, "5.9.12");
//! assert!(codec::is_within("5.9.12.40", &mine));
//! ```

pub mod codec;
mod index;

#[cfg(test)]
mod proptests;

pub use index::{IndexPath, InvalidIndexError, RecordId};
