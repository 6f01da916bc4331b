//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixture builders for testing
//! the matpath library.

pub mod database;

use matpath::{Hierarchical, Hierarchy, Record};
use serde_json::json;

/// Builds and saves a record under `parent`, named by `name`.
///
/// # Panics
///
/// Panics if the record cannot be saved. This is acceptable in test code
/// where we want to fail fast on invalid fixtures.
#[allow(dead_code)]
pub fn add<S: Hierarchy>(store: &mut S, name: &str, parent: Option<&Record>) -> Record {
    let mut record = Record::new(json!({ "name": name }));
    record
        .set_parent(parent)
        .expect("fixture parent should be persisted");
    store.save(&mut record).expect("fixture should save");
    record
}

/// Returns the ids of `records`, in order.
#[allow(dead_code)]
pub fn ids(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|r| r.id())
        .map(|id| id.value())
        .collect()
}

/// Returns the `name` field of each record's payload, in order.
#[allow(dead_code)]
pub fn names(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.payload()["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
