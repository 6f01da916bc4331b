//! Subtree path rewrites for reparented records.
//!
//! When a persisted record moves, every descendant stores a path that begins
//! with the record's old own path. A [`PathChange`] captures the old and new
//! own paths, and rewriting replaces that dot-bounded prefix on each
//! affected path. Stores must apply the whole change as one atomic mutation
//! together with the moved record's own update.

use crate::error::{Error, Result};
use crate::path::{codec, RecordId};
use crate::record::Record;
use crate::Hierarchical;

/// A pending move of one record, and with it, its subtree.
///
/// # Examples
///
/// ```
/// use matpath::{PathChange, RecordId};
///
/// let id = RecordId::try_from(1).unwrap();
/// let change = PathChange::new(id, "", "4").unwrap().unwrap();
/// assert_eq!(change.old_prefix(), "1");
/// assert_eq!(change.new_prefix(), "4.1");
///
/// assert_eq!(change.apply("1.2").as_deref(), Some("4.1.2"));
/// assert_eq!(change.apply("12.3"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
    record: RecordId,
    old_path: String,
    new_path: String,
    old_prefix: String,
    new_prefix: String,
}

impl PathChange {
    /// Describes moving `record` from `old_path` to `new_path`.
    ///
    /// Both arguments are stored paths of the record itself, i.e. its old and
    /// new parent's own paths. Returns `Ok(None)` when nothing moved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if either path is malformed, and
    /// [`Error::Cycle`] if `new_path` lies inside the record's own subtree.
    pub fn new(record: RecordId, old_path: &str, new_path: &str) -> Result<Option<Self>> {
        codec::validate(old_path)?;
        codec::validate(new_path)?;

        if old_path == new_path {
            return Ok(None);
        }

        let old_prefix = codec::child_path(old_path, record);
        if codec::is_within(new_path, &old_prefix) {
            return Err(Error::Cycle {
                record: record.value(),
                parent_path: new_path.to_string(),
            });
        }

        Ok(Some(Self {
            record,
            old_path: old_path.to_string(),
            new_path: new_path.to_string(),
            new_prefix: codec::child_path(new_path, record),
            old_prefix,
        }))
    }

    /// Returns the id of the moved record.
    #[must_use]
    pub const fn record(&self) -> RecordId {
        self.record
    }

    /// Returns the moved record's previous stored path.
    #[must_use]
    pub fn old_path(&self) -> &str {
        &self.old_path
    }

    /// Returns the moved record's new stored path.
    #[must_use]
    pub fn new_path(&self) -> &str {
        &self.new_path
    }

    /// Returns the own path the subtree currently hangs under.
    #[must_use]
    pub fn old_prefix(&self) -> &str {
        &self.old_prefix
    }

    /// Returns the own path the subtree will hang under.
    #[must_use]
    pub fn new_prefix(&self) -> &str {
        &self.new_prefix
    }

    /// Returns `true` if a record stored at `path` is a descendant of the
    /// moved record.
    #[must_use]
    pub fn affects(&self, path: &str) -> bool {
        codec::is_within(path, &self.old_prefix)
    }

    /// Returns the rewritten form of a descendant's `path`, or `None` when
    /// the path lies outside the moved subtree.
    #[must_use]
    pub fn apply(&self, path: &str) -> Option<String> {
        codec::rebase(path, &self.old_prefix, &self.new_prefix)
    }
}

/// Applies [`PathChange`]s to records held in memory.
///
/// # Examples
///
/// ```
/// use matpath::{Hierarchical, PathChange, Record, RecordId, SubtreeRewriter};
/// use serde_json::Value;
///
/// let id = |v: i64| RecordId::try_from(v).unwrap();
/// let mut records = vec![
///     Record::persisted(id(1), "", Value::Null),
///     Record::persisted(id(2), "1", Value::Null),
///     Record::persisted(id(3), "1.2", Value::Null),
///     Record::persisted(id(4), "", Value::Null),
/// ];
///
/// let change = PathChange::new(id(1), "", "4").unwrap().unwrap();
/// let rewritten = SubtreeRewriter::rewrite_records(&change, &mut records);
///
/// assert_eq!(rewritten, 2);
/// let paths: Vec<&str> = records.iter().map(|r| r.path()).collect();
/// assert_eq!(paths, ["4", "4.1", "4.1.2", ""]);
/// ```
pub struct SubtreeRewriter;

impl SubtreeRewriter {
    /// Rewrites every descendant of the moved record in `records`.
    ///
    /// The moved record itself is given its new path if present, but only
    /// descendants are counted. Records outside the subtree are untouched.
    pub fn rewrite_records(change: &PathChange, records: &mut [Record]) -> usize {
        let mut rewritten = 0;
        for record in records.iter_mut() {
            if record.id() == Some(change.record()) {
                record.store_path(change.new_path().to_string());
            } else if let Some(path) = change.apply(record.path()) {
                record.store_path(path);
                rewritten += 1;
            }
        }

        log::debug!(
            "rewrote {rewritten} path(s) from '{}' to '{}'",
            change.old_prefix(),
            change.new_prefix()
        );
        rewritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn id(value: i64) -> RecordId {
        RecordId::try_from(value).unwrap()
    }

    #[test]
    fn test_unchanged_path_is_no_change() {
        assert!(PathChange::new(id(3), "1.2", "1.2").unwrap().is_none());
        assert!(PathChange::new(id(3), "", "").unwrap().is_none());
    }

    #[test]
    fn test_prefixes() {
        let change = PathChange::new(id(2), "", "1").unwrap().unwrap();
        assert_eq!(change.record(), id(2));
        assert_eq!(change.old_path(), "");
        assert_eq!(change.new_path(), "1");
        assert_eq!(change.old_prefix(), "2");
        assert_eq!(change.new_prefix(), "1.2");
    }

    #[test]
    fn test_move_to_top_level() {
        let change = PathChange::new(id(3), "1.2", "").unwrap().unwrap();
        assert_eq!(change.new_prefix(), "3");
        assert_eq!(change.apply("1.2.3.9").as_deref(), Some("3.9"));
    }

    #[test]
    fn test_cycle_rejected() {
        // Under itself.
        let err = PathChange::new(id(1), "", "1").unwrap_err();
        assert!(matches!(err, Error::Cycle { record: 1, .. }));
        // Under a descendant.
        let err = PathChange::new(id(1), "", "1.2.3").unwrap_err();
        assert!(matches!(err, Error::Cycle { .. }));
        // A lookalike prefix is not a descendant.
        assert!(PathChange::new(id(1), "", "12").unwrap().is_some());
    }

    #[test]
    fn test_malformed_paths_rejected() {
        assert!(PathChange::new(id(1), "x", "2").unwrap_err().is_format());
        assert!(PathChange::new(id(1), "", "2..3").unwrap_err().is_format());
    }

    #[test]
    fn test_apply_is_dot_bounded() {
        let change = PathChange::new(id(1), "", "4").unwrap().unwrap();
        assert!(change.affects("1"));
        assert!(change.affects("1.2"));
        assert!(!change.affects("12.3"));
        assert!(!change.affects("4"));
        assert!(!change.affects(""));
    }

    #[test]
    fn test_rewrite_records_touches_only_subtree() {
        let mut records = vec![
            Record::persisted(id(1), "", Value::Null),
            Record::persisted(id(2), "1", Value::Null),
            Record::persisted(id(3), "1.2", Value::Null),
            Record::persisted(id(4), "", Value::Null),
            Record::persisted(id(12), "", Value::Null),
            Record::persisted(id(13), "12", Value::Null),
        ];

        let change = PathChange::new(id(1), "", "4").unwrap().unwrap();
        let rewritten = SubtreeRewriter::rewrite_records(&change, &mut records);

        assert_eq!(rewritten, 2);
        let paths: Vec<&str> = records.iter().map(Hierarchical::path).collect();
        assert_eq!(paths, ["4", "4.1", "4.1.2", "", "", "12"]);
        // Rewritten records are clean afterwards.
        assert!(records.iter().all(|r| r.pending_move().unwrap().is_none()));
    }

    #[test]
    fn test_rewrite_without_descendants_is_noop() {
        let mut records = vec![
            Record::persisted(id(1), "", Value::Null),
            Record::persisted(id(2), "", Value::Null),
        ];
        let change = PathChange::new(id(2), "", "1").unwrap().unwrap();
        assert_eq!(SubtreeRewriter::rewrite_records(&change, &mut records), 0);
        assert_eq!(records[1].path(), "1");
        assert_eq!(records[0].path(), "");
    }
}
