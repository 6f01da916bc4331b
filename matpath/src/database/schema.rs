//! Database schema definitions and SQL constants.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the records table.
///
/// `path` holds the ancestor ids root first, dot separated, and is empty for
/// top-level records. `AUTOINCREMENT` keeps ids of deleted records from being
/// reused, since stale paths elsewhere may still mention them.
pub const CREATE_RECORDS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS records (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        path TEXT NOT NULL DEFAULT '',
        payload TEXT NOT NULL
    )";

/// Index serving exact-path and prefix lookups.
pub const CREATE_PATH_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_records_path ON records(path)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Columns selected for every record read, in row-decoding order.
pub const RECORD_COLUMNS: &str = "id, path, payload";

/// Inserts a record; the id is assigned by `SQLite`.
pub const INSERT_RECORD: &str = "INSERT INTO records (path, payload) VALUES (?1, ?2)";

/// Overwrites the path and payload of one record.
pub const UPDATE_RECORD: &str = "UPDATE records SET path = ?2, payload = ?3 WHERE id = ?1";

/// Overwrites the payload of one record. Paths only change through moves.
pub const UPDATE_PAYLOAD: &str = "UPDATE records SET payload = ?2 WHERE id = ?1";

/// Rewrites the leading `?1` of every path within it to `?2`.
///
/// The match is dot-bounded so that a prefix `1` never touches `12`.
pub const REBASE_SUBTREE: &str = r"
    UPDATE records
    SET path = ?2 || substr(path, length(?1) + 1)
    WHERE path = ?1 OR substr(path, 1, length(?1) + 1) = ?1 || '.'
";
