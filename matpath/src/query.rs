//! Hierarchy navigation expressed as store-independent queries.
//!
//! Every navigation question about a record (its parent, children, ancestors,
//! descendants or siblings) reduces to a [`Predicate`] over the two stored
//! columns, `id` and `path`. Builders here compute that predicate from the
//! record alone; a [`RecordStore`](crate::RecordStore) translates it into
//! whatever its backend understands, and [`HierarchyQuery::evaluate`] runs
//! it over records already in memory.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::path::{codec, IndexPath, RecordId};
use crate::tree::TreeAssembler;
use crate::Hierarchical;

/// A filter over a record's id and stored path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches no record.
    Nothing,

    /// Matches every record.
    All,

    /// Matches the record with this id.
    IdEquals(RecordId),

    /// Matches records whose id is in the list.
    IdIn(Vec<RecordId>),

    /// Matches records stored at exactly this path.
    PathEquals(String),

    /// Matches records stored at this path or anywhere below it.
    ///
    /// The match is dot-bounded: `"1"` covers `"1"` and `"1.5"` but not
    /// `"12"`.
    PathWithin(String),

    /// Matches records stored at `path`, except the one with `id`.
    PathEqualsExcept {
        /// The shared stored path.
        path: String,
        /// The excluded record.
        id: RecordId,
    },

    /// Matches records without ancestors.
    TopLevel,
}

impl Predicate {
    /// Evaluates the predicate for a record with `id` stored at `path`.
    #[must_use]
    pub fn matches(&self, id: Option<RecordId>, path: &str) -> bool {
        match self {
            Self::Nothing => false,
            Self::All => true,
            Self::IdEquals(wanted) => id == Some(*wanted),
            Self::IdIn(wanted) => id.is_some_and(|id| wanted.contains(&id)),
            Self::PathEquals(wanted) => path == wanted,
            Self::PathWithin(prefix) => codec::is_within(path, prefix),
            Self::PathEqualsExcept {
                path: wanted,
                id: excluded,
            } => path == wanted && id != Some(*excluded),
            Self::TopLevel => path.is_empty(),
        }
    }

    /// Returns `true` if no record can ever match.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        match self {
            Self::Nothing => true,
            Self::IdIn(ids) => ids.is_empty(),
            _ => false,
        }
    }
}

/// Result ordering for a [`HierarchyQuery`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryOrder {
    /// Ascending id.
    #[default]
    Id,

    /// Fewest ancestors first, then ascending id.
    Depth,

    /// Ascending `(index_path, id)`, the order tree assembly consumes.
    ///
    /// This is integer-lexicographic over path components and cannot be
    /// expressed as plain string ordering, so stores apply it in memory.
    Assembly,
}

/// A predicate together with the order its results come back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyQuery {
    /// Which records to return.
    pub predicate: Predicate,

    /// How to order them.
    pub order: QueryOrder,
}

impl HierarchyQuery {
    /// Creates a query ordered by id.
    #[must_use]
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            order: QueryOrder::default(),
        }
    }

    /// Replaces the ordering.
    #[must_use]
    pub fn with_order(mut self, order: QueryOrder) -> Self {
        self.order = order;
        self
    }

    /// Orders results senior first: top-level records, then their children,
    /// and so on.
    #[must_use]
    pub fn priority_order(self) -> Self {
        self.with_order(QueryOrder::Depth)
    }

    /// Filters and orders records held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the order is [`QueryOrder::Assembly`] and
    /// a matching record has a malformed path.
    pub fn evaluate<T, I>(&self, records: I) -> Result<Vec<T>>
    where
        T: Hierarchical,
        I: IntoIterator<Item = T>,
    {
        let matched = records
            .into_iter()
            .filter(|r| self.predicate.matches(r.id(), r.path()))
            .collect();
        self.sort(matched)
    }

    /// Applies this query's ordering to `records`.
    ///
    /// # Errors
    ///
    /// As [`HierarchyQuery::evaluate`].
    pub fn sort<T: Hierarchical>(&self, mut records: Vec<T>) -> Result<Vec<T>> {
        match self.order {
            QueryOrder::Id => records.sort_by_key(|r| r.id()),
            QueryOrder::Depth => records.sort_by_key(|r| (r.depth(), r.id())),
            QueryOrder::Assembly => return TreeAssembler::sort_records(records),
        }
        Ok(records)
    }
}

/// Query for the record's parent.
///
/// # Errors
///
/// Returns [`Error::Format`] if the stored path is malformed.
pub fn parent_of<T: Hierarchical + ?Sized>(record: &T) -> Result<HierarchyQuery> {
    let predicate = match record.index_path()?.last() {
        Some(parent) => Predicate::IdEquals(parent),
        None => Predicate::Nothing,
    };
    Ok(HierarchyQuery::new(predicate))
}

/// Query for the record's direct children.
///
/// # Errors
///
/// Returns [`Error::InvalidParent`] if the record has no id, and
/// [`Error::Format`] if its path is malformed.
pub fn children_of<T: Hierarchical + ?Sized>(record: &T) -> Result<HierarchyQuery> {
    codec::validate(record.path())?;
    Ok(HierarchyQuery::new(Predicate::PathEquals(record.my_path()?)))
}

/// Query for every ancestor of the record, senior first.
///
/// Stores may return the rows in any order; pass them through
/// [`order_ancestors`] to restore root-first order.
///
/// # Errors
///
/// Returns [`Error::Format`] if the stored path is malformed.
pub fn ancestors_of<T: Hierarchical + ?Sized>(record: &T) -> Result<HierarchyQuery> {
    let path = record.index_path()?;
    let predicate = if path.is_empty() {
        Predicate::Nothing
    } else {
        Predicate::IdIn(path.iter().collect())
    };
    Ok(HierarchyQuery::new(predicate).priority_order())
}

/// Query for every record below this one.
///
/// # Errors
///
/// As [`children_of`].
pub fn descendants_of<T: Hierarchical + ?Sized>(record: &T) -> Result<HierarchyQuery> {
    codec::validate(record.path())?;
    Ok(HierarchyQuery::new(Predicate::PathWithin(record.my_path()?)))
}

/// Query for the other records sharing this record's parent.
///
/// An unsaved record has no id to exclude, so every record at its path
/// matches.
///
/// # Errors
///
/// Returns [`Error::Format`] if the stored path is malformed.
pub fn siblings_of<T: Hierarchical + ?Sized>(record: &T) -> Result<HierarchyQuery> {
    codec::validate(record.path())?;
    let path = record.path().to_string();
    let predicate = match record.id() {
        Some(id) => Predicate::PathEqualsExcept { path, id },
        None => Predicate::PathEquals(path),
    };
    Ok(HierarchyQuery::new(predicate))
}

/// Query for every record without ancestors.
#[must_use]
pub fn top_level() -> HierarchyQuery {
    HierarchyQuery::new(Predicate::TopLevel)
}

/// Query for every record.
#[must_use]
pub fn all() -> HierarchyQuery {
    HierarchyQuery::new(Predicate::All)
}

/// Orders ancestor rows root first, following `path`.
///
/// # Errors
///
/// Returns [`Error::Integrity`] if an id named by `path` has no row.
pub fn order_ancestors<T: Hierarchical>(path: &IndexPath, rows: Vec<T>) -> Result<Vec<T>> {
    let mut by_id: HashMap<RecordId, T> = rows
        .into_iter()
        .filter_map(|row| row.id().map(|id| (id, row)))
        .collect();

    path.iter()
        .map(|id| {
            by_id.remove(&id).ok_or_else(|| Error::Integrity {
                details: format!("ancestor {id} of path '{path}' does not exist"),
            })
        })
        .collect()
}
