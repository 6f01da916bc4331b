//! Record identifiers and index paths.
//!
//! An [`IndexPath`] is the parsed form of a stored materialized path: the ids
//! of every ancestor of a record, senior-most first.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::codec;

/// A persisted record identifier (always positive).
///
/// # Examples
///
/// ```
/// use matpath::RecordId;
///
/// let id = RecordId::try_from(42).unwrap();
/// assert_eq!(id.value(), 42);
///
/// assert!(RecordId::try_from(0).is_err());
/// assert!(RecordId::try_from(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecordId(i64);

impl RecordId {
    /// Returns the underlying integer id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for RecordId {
    type Error = InvalidIndexError;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(InvalidIndexError {
                value,
                reason: "record ids must be positive integers".into(),
            })
        }
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for values that cannot be used as record ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIndexError {
    /// The rejected value.
    pub value: i64,
    /// The reason the value was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid index {}: {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidIndexError {}

/// The ancestor chain of a record, root first.
///
/// The last element is the immediate parent; an empty path belongs to a
/// top-level record. The derived ordering is lexicographic with a strict
/// prefix sorting first, which, with an id tiebreak, is depth-first order.
///
/// # Examples
///
/// ```
/// use matpath::IndexPath;
///
/// let path = IndexPath::parse("1.10.22").unwrap();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.last().unwrap().value(), 22);
/// assert_eq!(path.to_string(), "1.10.22");
///
/// let shallower = IndexPath::parse("1.10").unwrap();
/// assert!(shallower < path);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexPath(Vec<RecordId>);

impl IndexPath {
    /// Creates an index path from raw integer ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] if any element is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use matpath::IndexPath;
    ///
    /// let path = IndexPath::new(vec![1, 2, 3]).unwrap();
    /// assert_eq!(path.len(), 3);
    /// assert!(IndexPath::new(vec![1, 0]).is_err());
    /// ```
    pub fn new(ids: Vec<i64>) -> Result<Self> {
        let ids = ids
            .into_iter()
            .map(RecordId::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self(ids))
    }

    /// Creates an index path from already validated ids.
    #[must_use]
    pub const fn from_ids(ids: Vec<RecordId>) -> Self {
        Self(ids)
    }

    /// Returns the empty path of a top-level record.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Parses a stored materialized path such as `"1.10.22"`.
    ///
    /// The empty string parses to the empty path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if any component is empty, non-numeric,
    /// non-positive or not written canonically.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self::root());
        }
        input
            .split(codec::SEPARATOR)
            .map(|component| parse_component(input, component))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Returns the number of ancestors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the path of a top-level record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the ancestor at `index`, senior-most at 0.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<RecordId> {
        self.0.get(index).copied()
    }

    /// Returns the top-most ancestor.
    #[must_use]
    pub fn first(&self) -> Option<RecordId> {
        self.0.first().copied()
    }

    /// Returns the immediate parent.
    #[must_use]
    pub fn last(&self) -> Option<RecordId> {
        self.0.last().copied()
    }

    /// Returns `true` if `id` is one of the ancestors.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.0.contains(&id)
    }

    /// Iterates over the ancestors, senior-most first.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, RecordId>> {
        self.0.iter().copied()
    }

    /// Returns the ancestors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[RecordId] {
        &self.0
    }
}

fn parse_component(input: &str, component: &str) -> Result<RecordId> {
    if component.is_empty() {
        return Err(Error::format(input, "empty path component"));
    }
    if !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::format(
            input,
            format!("component '{component}' is not a number"),
        ));
    }
    if component.starts_with('0') {
        return Err(Error::format(
            input,
            format!("component '{component}' is not a positive canonical id"),
        ));
    }
    let value: i64 = component.parse().map_err(|_| {
        Error::format(input, format!("component '{component}' is out of range"))
    })?;
    RecordId::try_from(value).map_err(|e| Error::format(input, e.reason))
}

impl Index<usize> for IndexPath {
    type Output = RecordId;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a IndexPath {
    type Item = RecordId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, RecordId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<i64>> for IndexPath {
    type Error = Error;

    fn try_from(ids: Vec<i64>) -> Result<Self> {
        Self::new(ids)
    }
}

impl FromStr for IndexPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", codec::SEPARATOR)?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}
