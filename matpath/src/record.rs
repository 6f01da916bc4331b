//! Hierarchy records and their lifecycle hooks.
//!
//! This module provides the [`Hierarchical`] trait shared by everything that
//! carries an id and a stored path, and the concrete [`Record`] type used by
//! the bundled store.
//!
//! Hosts call two hooks explicitly: [`Record::before_insert`] before a record
//! is first persisted, and [`Record::pending_move`] after a persisted record
//! may have been given a new parent.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::path::{codec, IndexPath, RecordId};
use crate::rewrite::PathChange;

/// Anything with an id and a stored materialized path.
///
/// Derived values are recomputed from the stored path on every call and are
/// never cached.
pub trait Hierarchical {
    /// Returns the record id, or `None` if the record was never persisted.
    fn id(&self) -> Option<RecordId>;

    /// Returns the stored path. An unset path reads as `""`.
    fn path(&self) -> &str;

    /// Returns `true` if the record has no ancestors.
    fn is_top_level(&self) -> bool {
        self.path().is_empty()
    }

    /// Parses the stored path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the stored path is malformed.
    fn index_path(&self) -> Result<IndexPath> {
        IndexPath::parse(self.path())
    }

    /// Returns the path this record's children store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParent`] if the record has no id yet.
    fn my_path(&self) -> Result<String> {
        let id = self.id().ok_or_else(|| Error::InvalidParent {
            reason: "record has not been persisted and has no id".into(),
        })?;
        Ok(codec::child_path(self.path(), id))
    }

    /// Returns the number of ancestors.
    fn depth(&self) -> usize {
        codec::depth(self.path())
    }
}

/// A record in a hierarchy-indexed store.
///
/// # Examples
///
/// ```
/// use matpath::{Hierarchical, Record, RecordId};
/// use serde_json::json;
///
/// let parent = Record::persisted(RecordId::try_from(1).unwrap(), "", json!("root"));
///
/// let mut child = Record::new(json!({ "name": "leaf" }));
/// child.set_parent(Some(&parent)).unwrap();
/// assert_eq!(child.path(), "1");
/// assert!(!child.is_top_level());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    id: Option<RecordId>,
    path: Option<String>,
    payload: Value,
    #[serde(skip)]
    saved_path: Option<String>,
}

impl Record {
    /// Creates a record that has not been persisted and has no parent.
    #[must_use]
    pub const fn new(payload: Value) -> Self {
        Self {
            id: None,
            path: None,
            payload,
            saved_path: None,
        }
    }

    /// Creates an unsaved record with an explicit stored path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if `path` is malformed.
    pub fn with_path(path: impl Into<String>, payload: Value) -> Result<Self> {
        let path = path.into();
        codec::validate(&path)?;
        Ok(Self {
            path: Some(path),
            ..Self::new(payload)
        })
    }

    /// Rebuilds a record as loaded from a store.
    ///
    /// The path is taken as stored; a malformed value surfaces as an error
    /// on first use rather than here.
    #[must_use]
    pub fn persisted(id: RecordId, path: impl Into<String>, payload: Value) -> Self {
        let path = path.into();
        Self {
            id: Some(id),
            saved_path: Some(path.clone()),
            path: Some(path),
            payload,
        }
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the payload for modification.
    pub fn payload_mut(&mut self) -> &mut Value {
        &mut self.payload
    }

    /// Returns `true` once the record has been assigned an id by a store.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Places this record under `parent`, or at the top level for `None`.
    ///
    /// Only the record's own path changes here; its subtree follows when the
    /// record is saved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParent`] if `parent` has not been persisted,
    /// [`Error::Format`] if the parent's path is malformed, and
    /// [`Error::Cycle`] if `parent` is this record or one of its descendants.
    pub fn set_parent<P: Hierarchical + ?Sized>(&mut self, parent: Option<&P>) -> Result<()> {
        let Some(parent) = parent else {
            return self.set_path(String::new());
        };

        let parent_id = parent.id().ok_or_else(|| Error::InvalidParent {
            reason: "parent cannot be a new record".into(),
        })?;
        codec::validate(parent.path())?;

        if self.id == Some(parent_id) {
            return Err(Error::Cycle {
                record: parent_id.value(),
                parent_path: parent.my_path()?,
            });
        }
        self.set_path(parent.my_path()?)
    }

    /// Sets the stored path directly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if `path` is malformed and [`Error::Cycle`]
    /// if it lies inside this record's own persisted subtree.
    pub fn set_path(&mut self, path: impl Into<String>) -> Result<()> {
        let path = path.into();
        codec::validate(&path)?;

        if let Some(id) = self.id {
            let own = codec::child_path(self.saved_path(), id);
            if codec::is_within(&path, &own) {
                return Err(Error::Cycle {
                    record: id.value(),
                    parent_path: path,
                });
            }
        }

        self.path = Some(path);
        Ok(())
    }

    /// Pre-insert hook: an unset path becomes the top-level path.
    pub fn before_insert(&mut self) {
        self.path.get_or_insert_with(String::new);
    }

    /// Post-change hook: the subtree rewrite needed to persist this record.
    ///
    /// Returns `None` for records that were never persisted or whose path is
    /// unchanged since they were loaded or saved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] or [`Error::Cycle`] as [`PathChange::new`].
    pub fn pending_move(&self) -> Result<Option<PathChange>> {
        match self.id {
            Some(id) => PathChange::new(id, self.saved_path(), self.path()),
            None => Ok(None),
        }
    }

    /// Records that the store now holds this record under `id`.
    pub fn mark_saved(&mut self, id: RecordId) {
        self.before_insert();
        self.id = Some(id);
        self.saved_path.clone_from(&self.path);
    }

    /// Sets the path as both current and persisted, as after a store rewrite.
    pub(crate) fn store_path(&mut self, path: String) {
        self.saved_path = Some(path.clone());
        self.path = Some(path);
    }

    fn saved_path(&self) -> &str {
        self.saved_path.as_deref().unwrap_or("")
    }
}

impl Hierarchical for Record {
    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }
}
