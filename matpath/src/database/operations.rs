//! Record reads and writes, and the translation of hierarchy predicates
//! into SQL.

use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, OptionalExtension};

use crate::error::{Error, Result};
use crate::path::RecordId;
use crate::query::{HierarchyQuery, Predicate, QueryOrder};
use crate::record::Record;
use crate::rewrite::PathChange;
use crate::store::RecordStore;
use crate::Hierarchical;

use super::connection::Database;
use super::schema::{RECORD_COLUMNS, UPDATE_PAYLOAD};

/// Number of path segments, computed in SQL.
const DEPTH_EXPR: &str =
    "CASE WHEN path = '' THEN 0 ELSE length(path) - length(replace(path, '.', '')) + 1 END";

/// Decodes a row selected with [`RECORD_COLUMNS`].
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let raw_id: i64 = row.get(0)?;
    let path: Option<String> = row.get(1)?;
    let payload: String = row.get(2)?;

    let id = RecordId::try_from(raw_id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(e)))?;
    let payload = serde_json::from_str(&payload)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(Record::persisted(id, path.unwrap_or_default(), payload))
}

/// Decodes a single non-negative count column.
fn count_column(row: &rusqlite::Row<'_>) -> rusqlite::Result<usize> {
    let count: i64 = row.get(0)?;
    usize::try_from(count)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(e)))
}

/// Builds the `WHERE` clause and its parameters for `predicate`.
///
/// Returns `None` for predicates that can never match, which need no query.
fn where_clause(predicate: &Predicate) -> Option<(String, Vec<SqlValue>)> {
    if predicate.is_nothing() {
        return None;
    }
    let clause = match predicate {
        Predicate::Nothing => return None,
        Predicate::All => ("1 = 1".to_string(), Vec::new()),
        Predicate::IdEquals(id) => ("id = ?1".to_string(), vec![SqlValue::Integer(id.value())]),
        Predicate::IdIn(ids) => {
            let placeholders = (1..=ids.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            (
                format!("id IN ({placeholders})"),
                ids.iter().map(|id| SqlValue::Integer(id.value())).collect(),
            )
        }
        Predicate::PathEquals(path) => ("path = ?1".to_string(), vec![SqlValue::Text(path.clone())]),
        Predicate::PathWithin(prefix) => (
            "(path = ?1 OR substr(path, 1, length(?1) + 1) = ?1 || '.')".to_string(),
            vec![SqlValue::Text(prefix.clone())],
        ),
        Predicate::PathEqualsExcept { path, id } => (
            "path = ?1 AND id <> ?2".to_string(),
            vec![SqlValue::Text(path.clone()), SqlValue::Integer(id.value())],
        ),
        Predicate::TopLevel => ("(path = '' OR path IS NULL)".to_string(), Vec::new()),
    };
    Some(clause)
}

fn order_clause(order: QueryOrder) -> String {
    match order {
        // Assembly order is not expressible over strings; it is applied after
        // fetching.
        QueryOrder::Id | QueryOrder::Assembly => "ORDER BY id".to_string(),
        QueryOrder::Depth => format!("ORDER BY {DEPTH_EXPR}, id"),
    }
}

/// Builds the complete `SELECT` for `query`, or `None` if it cannot match.
pub(super) fn select_sql(query: &HierarchyQuery) -> Option<(String, Vec<SqlValue>)> {
    let (clause, values) = where_clause(&query.predicate)?;
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM records WHERE {clause} {}",
        order_clause(query.order)
    );
    Some((sql, values))
}

impl Database {
    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_records(&self) -> Result<usize> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], count_column)?)
    }
}

impl RecordStore for Database {
    fn fetch(&self, query: &HierarchyQuery) -> Result<Vec<Record>> {
        let Some((sql, values)) = select_sql(query) else {
            return Ok(Vec::new());
        };
        log::debug!("fetching records: {sql}");

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let records = stmt
            .query_map(params_from_iter(values), row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        query.sort(records)
    }

    fn get(&self, id: RecordId) -> Result<Option<Record>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, [id.value()], row_to_record)
            .optional()?)
    }

    fn insert(&mut self, record: &Record) -> Result<RecordId> {
        self.insert_under_parent(record)
    }

    fn update(&mut self, record: &Record) -> Result<()> {
        let id = record.id().ok_or_else(|| Error::Validation {
            field: "id".into(),
            message: "cannot update a record that was never inserted".into(),
        })?;
        let payload = serde_json::to_string(record.payload())?;

        let changed = self
            .conn
            .execute(UPDATE_PAYLOAD, params![id.value(), payload])?;
        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("record {id}"),
            });
        }
        Ok(())
    }

    fn move_subtree(&mut self, record: &Record, change: &PathChange) -> Result<usize> {
        self.rebase_subtree(record, change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, insert_chain, insert_raw};
    use crate::query;
    use serde_json::json;

    fn id(value: i64) -> RecordId {
        RecordId::try_from(value).unwrap()
    }

    fn ids(records: &[Record]) -> Vec<i64> {
        records.iter().map(|r| r.id().unwrap().value()).collect()
    }

    #[test]
    fn test_insert_and_get() {
        let mut db = create_test_database();
        let mut record = Record::new(json!({"name": "root"}));
        record.before_insert();

        let new_id = db.insert(&record).unwrap();
        let loaded = db.get(new_id).unwrap().unwrap();
        assert_eq!(loaded.id(), Some(new_id));
        assert_eq!(loaded.path(), "");
        assert_eq!(loaded.payload(), &json!({"name": "root"}));
        assert!(loaded.pending_move().unwrap().is_none());
    }

    #[test]
    fn test_get_missing() {
        let db = create_test_database();
        assert!(db.get(id(42)).unwrap().is_none());
    }

    #[test]
    fn test_update_payload() {
        let mut db = create_test_database();
        let root = insert_chain(&mut db, 1)[0];

        let mut loaded = db.get(root).unwrap().unwrap();
        *loaded.payload_mut() = json!("renamed");
        db.update(&loaded).unwrap();

        assert_eq!(db.get(root).unwrap().unwrap().payload(), &json!("renamed"));
    }

    #[test]
    fn test_update_missing_or_unsaved() {
        let mut db = create_test_database();
        let ghost = Record::persisted(id(7), "", json!(null));
        assert!(matches!(db.update(&ghost).unwrap_err(), Error::NotFound { .. }));

        let unsaved = Record::new(json!(null));
        assert!(matches!(db.update(&unsaved).unwrap_err(), Error::Validation { .. }));
    }

    #[test]
    fn test_nothing_predicate_skips_query() {
        assert!(select_sql(&HierarchyQuery::new(Predicate::Nothing)).is_none());
        assert!(select_sql(&HierarchyQuery::new(Predicate::IdIn(Vec::new()))).is_none());

        let db = create_test_database();
        assert!(db.fetch(&HierarchyQuery::new(Predicate::Nothing)).unwrap().is_empty());
    }

    #[test]
    fn test_path_within_is_dot_bounded() {
        let db = create_test_database();
        for path in ["", "1", "1.2", "12", "12.3", "1.20"] {
            insert_raw(&db, path);
        }

        let found = db
            .fetch(&HierarchyQuery::new(Predicate::PathWithin("1".into())))
            .unwrap();
        let paths: Vec<&str> = found.iter().map(Hierarchical::path).collect();
        assert_eq!(paths, ["1", "1.2", "1.20"]);
    }

    #[test]
    fn test_depth_order() {
        let db = create_test_database();
        for path in ["1.2", "", "1", "1.2.3", ""] {
            insert_raw(&db, path);
        }

        let found = db.fetch(&query::all().priority_order()).unwrap();
        assert_eq!(ids(&found), vec![2, 5, 3, 1, 4]);
    }

    #[test]
    fn test_assembly_order_is_numeric() {
        let db = create_test_database();
        for path in ["10", "9", ""] {
            insert_raw(&db, path);
        }

        let found = db
            .fetch(&query::all().with_order(QueryOrder::Assembly))
            .unwrap();
        assert_eq!(ids(&found), vec![3, 2, 1]);
    }

    #[test]
    fn test_corrupt_payload_is_reported() {
        let db = create_test_database();
        db.connection()
            .execute("INSERT INTO records (path, payload) VALUES ('', 'not json')", [])
            .unwrap();

        let err = db.fetch(&query::all()).unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn test_count_records() {
        let mut db = create_test_database();
        assert_eq!(db.count_records().unwrap(), 0);
        insert_chain(&mut db, 3);
        assert_eq!(db.count_records().unwrap(), 3);
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let db = create_test_database();
        let err = db
            .connection()
            .query_row("SELECT -1", [], count_column)
            .unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, _)));
    }
}
