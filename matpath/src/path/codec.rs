//! Conversions between stored path strings and index paths.
//!
//! Stored paths are dot-separated record ids, root first, never including
//! the record itself. The empty string marks a top-level record. All prefix
//! tests here are dot-bounded: `"12.3"` is not inside `"1"`.

use crate::error::Result;

use super::index::{IndexPath, RecordId};

/// Separator between ids in a stored path.
pub const SEPARATOR: char = '.';

/// Parses a stored path into an [`IndexPath`].
///
/// # Errors
///
/// Returns [`crate::Error::Format`] for malformed input.
pub fn parse(path: &str) -> Result<IndexPath> {
    IndexPath::parse(path)
}

/// Formats an [`IndexPath`] as a stored path string.
///
/// # Examples
///
/// ```
/// use matpath::path::codec;
///
/// let path = codec::parse("2.5").unwrap();
/// assert_eq!(codec::format(&path), "2.5");
/// ```
#[must_use]
pub fn format(path: &IndexPath) -> String {
    path.to_string()
}

/// Checks that `path` is a well-formed stored path.
///
/// # Errors
///
/// Returns [`crate::Error::Format`] for malformed input.
pub fn validate(path: &str) -> Result<()> {
    IndexPath::parse(path).map(|_| ())
}

/// Returns the own path of record `id` stored at `parent_path`.
///
/// This is the value every child of the record stores as its path.
///
/// # Examples
///
/// ```
/// use matpath::{path::codec, RecordId};
///
/// let id = RecordId::try_from(7).unwrap();
/// assert_eq!(codec::child_path("", id), "7");
/// assert_eq!(codec::child_path("1.3", id), "1.3.7");
/// ```
#[must_use]
pub fn child_path(parent_path: &str, id: RecordId) -> String {
    if parent_path.is_empty() {
        id.to_string()
    } else {
        format!("{parent_path}{SEPARATOR}{id}")
    }
}

/// Returns `true` if `path` equals `prefix` or continues it past a dot.
///
/// # Examples
///
/// ```
/// use matpath::path::codec;
///
/// assert!(codec::is_within("1", "1"));
/// assert!(codec::is_within("1.2.3", "1.2"));
/// assert!(!codec::is_within("12.3", "1"));
/// assert!(!codec::is_within("1", "1.2"));
/// ```
#[must_use]
pub fn is_within(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Replaces the leading `old_prefix` of `path` with `new_prefix`.
///
/// Returns `None` when `path` is not within `old_prefix`.
///
/// # Examples
///
/// ```
/// use matpath::path::codec;
///
/// assert_eq!(codec::rebase("1.2", "1", "4.1").as_deref(), Some("4.1.2"));
/// assert_eq!(codec::rebase("12.2", "1", "4.1"), None);
/// ```
#[must_use]
pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if !is_within(path, old_prefix) {
        return None;
    }
    let rest = &path[old_prefix.len()..];
    Some(format!("{new_prefix}{rest}"))
}

/// Returns the number of ids in a stored path.
///
/// # Examples
///
/// ```
/// use matpath::path::codec;
///
/// assert_eq!(codec::depth(""), 0);
/// assert_eq!(codec::depth("4.8.15"), 3);
/// ```
#[must_use]
pub fn depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.matches(SEPARATOR).count() + 1
    }
}
