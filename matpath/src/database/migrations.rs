//! Database schema management and migrations.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_METADATA_TABLE, CREATE_PATH_INDEX, CREATE_RECORDS_TABLE, CURRENT_SCHEMA_VERSION,
    INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Creates all tables, indices and the version marker for a fresh database.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use matpath::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_RECORDS_TABLE, [])?;
    conn.execute(CREATE_PATH_INDEX, [])?;
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    log::debug!("initialized schema version {CURRENT_SCHEMA_VERSION}");
    Ok(())
}

/// Gets the current schema version from the database.
///
/// Returns `Ok(0)` if the metadata table doesn't exist or has no version.
///
/// # Errors
///
/// Returns an error for any other database failure, or if the stored
/// version is not a number.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value.parse::<i32>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(rusqlite::Error::SqliteFailure(_, Some(message)))
            if message.starts_with("no such table") =>
        {
            Ok(0)
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks schema compatibility and initializes a fresh database.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] if the database was written
/// by a different schema version, or an error if initialization fails.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    match get_schema_version(conn)? {
        0 => initialize_schema(conn),
        CURRENT_SCHEMA_VERSION => Ok(()),
        found => Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found,
        }),
    }
}
