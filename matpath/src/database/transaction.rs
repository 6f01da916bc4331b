//! Transactional subtree moves.

use rusqlite::{params, OptionalExtension, Transaction, TransactionBehavior};

use crate::error::{Error, Result};
use crate::path::{codec, IndexPath, RecordId};
use crate::record::Record;
use crate::rewrite::PathChange;
use crate::Hierarchical;

use super::connection::Database;
use super::schema::{INSERT_RECORD, REBASE_SUBTREE, UPDATE_RECORD};

const SELECT_PATH: &str = "SELECT path FROM records WHERE id = ?1";

impl Database {
    /// Inserts `record` after checking that its path is its parent's own
    /// path, in one `IMMEDIATE` transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParent`] if the parent named by the path is
    /// missing or has moved, [`Error::Format`] if the path is malformed, or a
    /// database error. Nothing is written on error.
    pub(super) fn insert_under_parent(&mut self, record: &Record) -> Result<RecordId> {
        let payload = serde_json::to_string(record.payload())?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        check_new_parent(&tx, record.path())?;
        tx.execute(INSERT_RECORD, params![record.path(), payload])?;
        let id = RecordId::try_from(tx.last_insert_rowid())?;

        tx.commit()?;
        Ok(id)
    }

    /// Moves `record` and rewrites every descendant path in one transaction.
    ///
    /// The transaction is taken with `BEGIN IMMEDIATE`, so concurrent writers
    /// queue on the busy timeout instead of interleaving. Both the moved
    /// record and its new parent are checked against their stored state
    /// first: a stale copy of either is rejected rather than written.
    ///
    /// Returns the number of descendants rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the record is gone,
    /// [`Error::Validation`] if it was moved by another writer since it was
    /// loaded, [`Error::InvalidParent`] if the new parent is missing or has
    /// moved, or a database error. Nothing is written on error.
    pub(super) fn rebase_subtree(&mut self, record: &Record, change: &PathChange) -> Result<usize> {
        let payload = serde_json::to_string(record.payload())?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        check_stored_path(&tx, change)?;
        check_new_parent(&tx, change.new_path())?;

        tx.execute(
            UPDATE_RECORD,
            params![change.record().value(), change.new_path(), payload],
        )?;
        let rewritten = tx.execute(
            REBASE_SUBTREE,
            params![change.old_prefix(), change.new_prefix()],
        )?;

        tx.commit()?;
        log::debug!(
            "rebased {rewritten} descendant path(s) from '{}' to '{}'",
            change.old_prefix(),
            change.new_prefix()
        );
        Ok(rewritten)
    }
}

fn stored_path(tx: &Transaction<'_>, id: i64) -> Result<Option<String>> {
    Ok(tx
        .query_row(SELECT_PATH, [id], |row| row.get::<_, Option<String>>(0))
        .optional()?
        .map(Option::unwrap_or_default))
}

fn check_stored_path(tx: &Transaction<'_>, change: &PathChange) -> Result<()> {
    let id = change.record();
    let current = stored_path(tx, id.value())?.ok_or_else(|| Error::NotFound {
        resource: format!("record {id}"),
    })?;
    if current != change.old_path() {
        return Err(Error::Validation {
            field: "path".into(),
            message: format!(
                "record {id} is stored at '{current}', not '{}'; reload it before moving",
                change.old_path()
            ),
        });
    }
    Ok(())
}

fn check_new_parent(tx: &Transaction<'_>, new_path: &str) -> Result<()> {
    let Some(parent) = IndexPath::parse(new_path)?.last() else {
        return Ok(());
    };
    let parent_path = stored_path(tx, parent.value())?.ok_or_else(|| Error::InvalidParent {
        reason: format!("parent record {parent} does not exist"),
    })?;
    if codec::child_path(&parent_path, parent) != new_path {
        return Err(Error::InvalidParent {
            reason: format!("parent record {parent} has moved; reload it and retry"),
        });
    }
    Ok(())
}
