//! The storage seam and the record-level navigation API built on it.
//!
//! A [`RecordStore`] only has to answer [`HierarchyQuery`]s and persist
//! records; everything else, from ancestor ordering to tree assembly and the
//! save lifecycle, comes from the blanket [`Hierarchy`] implementation.

use crate::error::Result;
use crate::path::RecordId;
use crate::query::{self, HierarchyQuery};
use crate::record::Record;
use crate::rewrite::PathChange;
use crate::tree::{Tree, TreeAssembler};
use crate::Hierarchical;

/// Persistence for hierarchy-indexed records.
///
/// This trait abstracts the backing store to enable both the bundled SQLite
/// implementation and mock implementations for testing.
#[cfg_attr(test, mockall::automock)]
pub trait RecordStore {
    /// Returns the records matching `query`, in the query's order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or a stored row is corrupt.
    fn fetch(&self, query: &HierarchyQuery) -> Result<Vec<Record>>;

    /// Returns the record with `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get(&self, id: RecordId) -> Result<Option<Record>>;

    /// Persists a new record and returns its assigned id.
    ///
    /// The record's path must be the own path of a stored parent, or empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParent`](crate::Error::InvalidParent) if the
    /// parent named by the path is missing or has moved, or a backend error.
    fn insert(&mut self, record: &Record) -> Result<RecordId>;

    /// Persists changes to an existing record without moving anything.
    ///
    /// The stored path is left as it is, so a stale copy cannot undo a move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the record is
    /// gone, or a backend error.
    fn update(&mut self, record: &Record) -> Result<()>;

    /// Persists `record` under its new path and rewrites its descendants.
    ///
    /// Both happen in one atomic mutation: either every affected path is
    /// rewritten or none is. Returns the number of descendants rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if the record is
    /// gone, or a backend error. Nothing is changed on error.
    fn move_subtree(&mut self, record: &Record, change: &PathChange) -> Result<usize>;
}

/// Navigation and lifecycle helpers for every [`RecordStore`].
pub trait Hierarchy: RecordStore {
    /// Returns the record's parent, or `None` at the top level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`](crate::Error::Format) if the stored path is
    /// malformed, or a store error.
    fn parent<R: Hierarchical + ?Sized>(&self, record: &R) -> Result<Option<Record>> {
        Ok(self.fetch(&query::parent_of(record)?)?.into_iter().next())
    }

    /// Returns the record's direct children.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParent`](crate::Error::InvalidParent) if the
    /// record has no id, or a store error.
    fn children<R: Hierarchical + ?Sized>(&self, record: &R) -> Result<Vec<Record>> {
        self.fetch(&query::children_of(record)?)
    }

    /// Returns the record's ancestors, root first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Integrity`](crate::Error::Integrity) if an ancestor
    /// named by the path does not exist, or a store error.
    fn ancestors<R: Hierarchical + ?Sized>(&self, record: &R) -> Result<Vec<Record>> {
        let path = record.index_path()?;
        if path.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.fetch(&query::ancestors_of(record)?)?;
        query::order_ancestors(&path, rows)
    }

    /// Returns every record below this one, in id order.
    ///
    /// # Errors
    ///
    /// As [`Hierarchy::children`].
    fn descendants<R: Hierarchical + ?Sized>(&self, record: &R) -> Result<Vec<Record>> {
        self.fetch(&query::descendants_of(record)?)
    }

    /// Returns the records sharing this record's parent, excluding itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`](crate::Error::Format) if the stored path is
    /// malformed, or a store error.
    fn siblings<R: Hierarchical + ?Sized>(&self, record: &R) -> Result<Vec<Record>> {
        self.fetch(&query::siblings_of(record)?)
    }

    /// Returns every record without ancestors.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    fn top_level(&self) -> Result<Vec<Record>> {
        self.fetch(&query::top_level())
    }

    /// Returns `true` if the record has no children.
    ///
    /// # Errors
    ///
    /// As [`Hierarchy::children`].
    fn is_bottom_level<R: Hierarchical + ?Sized>(&self, record: &R) -> Result<bool> {
        Ok(self.children(record)?.is_empty())
    }

    /// Loads every record into one tree under a synthetic root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Integrity`](crate::Error::Integrity) if the stored
    /// paths do not describe a forest, or a store error.
    fn tree(&self) -> Result<Tree<Record>> {
        let records = TreeAssembler::sort_records(self.fetch(&query::all())?)?;
        TreeAssembler::assemble(records)
    }

    /// Loads the subtree rooted at `root`.
    ///
    /// # Errors
    ///
    /// As [`Hierarchy::tree`], plus
    /// [`Error::InvalidParent`](crate::Error::InvalidParent) if `root` has no
    /// id.
    fn subtree(&self, root: Record) -> Result<Tree<Record>> {
        let records = TreeAssembler::sort_records(self.descendants(&root)?)?;
        TreeAssembler::assemble_under(root, records)
    }

    /// Persists `record`, inserting, moving or updating as needed.
    ///
    /// Returns the number of descendants whose paths were rewritten. After
    /// a move, other in-memory copies of those descendants are stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cycle`](crate::Error::Cycle) if the record was moved
    /// under itself or a descendant, or a store error. The record is left
    /// unchanged on error.
    fn save(&mut self, record: &mut Record) -> Result<usize> {
        if !record.is_persisted() {
            record.before_insert();
            let id = self.insert(record)?;
            record.mark_saved(id);
            log::debug!("inserted record {id} at path '{}'", record.path());
            return Ok(0);
        }

        match record.pending_move()? {
            Some(change) => {
                let rewritten = self.move_subtree(record, &change)?;
                record.mark_saved(change.record());
                log::debug!(
                    "moved record {} from '{}' to '{}' with {rewritten} descendant(s)",
                    change.record(),
                    change.old_path(),
                    change.new_path()
                );
                Ok(rewritten)
            }
            None => {
                self.update(record)?;
                Ok(0)
            }
        }
    }
}

impl<S: RecordStore + ?Sized> Hierarchy for S {}
