//! Shared test utilities for database unit tests.

use crate::database::Database;
use crate::path::RecordId;
use crate::query;
use crate::record::Record;
use crate::store::RecordStore;
use crate::Hierarchical;

/// Creates an empty in-memory database.
///
/// # Panics
///
/// Panics if the database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    Database::open_in_memory().unwrap()
}

/// Inserts `len` records, each the child of the one before, and returns
/// their ids root first.
///
/// # Panics
///
/// Panics if an insert fails.
pub fn insert_chain(db: &mut Database, len: usize) -> Vec<RecordId> {
    let mut ids = Vec::with_capacity(len);
    let mut parent: Option<Record> = None;
    for depth in 0..len {
        let mut record = Record::new(serde_json::json!({ "depth": depth }));
        record.set_parent(parent.as_ref()).unwrap();
        record.before_insert();
        let id = db.insert(&record).unwrap();
        record.mark_saved(id);
        ids.push(id);
        parent = Some(record);
    }
    ids
}

/// Inserts a row at `path` directly, bypassing the parent check.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn insert_raw(db: &Database, path: &str) -> RecordId {
    db.connection()
        .execute(
            "INSERT INTO records (path, payload) VALUES (?1, 'null')",
            [path],
        )
        .unwrap();
    RecordId::try_from(db.connection().last_insert_rowid()).unwrap()
}

/// Returns every stored path in id order.
///
/// # Panics
///
/// Panics if the query fails.
#[must_use]
pub fn paths(db: &Database) -> Vec<String> {
    db.fetch(&query::all())
        .unwrap()
        .iter()
        .map(|r| r.path().to_string())
        .collect()
}
