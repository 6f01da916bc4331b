//! Shared database test utilities.

use matpath::database::{Database, DatabaseConfig};
use tempfile::TempDir;

/// Creates a file-backed test database in a fresh temporary directory.
///
/// The directory is returned alongside the database so it outlives it.
#[allow(dead_code)]
pub fn create_test_database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(DatabaseConfig::new(dir.path().join("test.db"))).unwrap();
    (dir, db)
}

/// Opens a second connection to the database inside `dir`.
#[allow(dead_code)]
pub fn reopen(dir: &TempDir) -> Database {
    Database::open(DatabaseConfig::new(dir.path().join("test.db")).without_auto_create()).unwrap()
}
