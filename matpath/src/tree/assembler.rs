//! Tree reconstruction from a flat, sorted record set.
//!
//! The assembler walks the input once. Starting from a root with an expected
//! path, it detaches every leading record whose stored path equals that
//! expectation, attaches them as children, and then descends into each child
//! in turn with the child's own path as the new expectation. In lexicographic
//! `(index_path, id)` order the children of a parent are adjacent and their
//! subtrees follow in child order, so the stack-driven pass always finds the
//! records it expects next at the front of the queue.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::path::{IndexPath, RecordId};
use crate::Hierarchical;

use super::{NodeId, Tree};

/// Rebuilds [`Tree`]s from records sorted by `(index_path, id)`.
pub struct TreeAssembler;

impl TreeAssembler {
    /// Sorts records into assembly order: by index path, then by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if any stored path is malformed.
    pub fn sort_records<T: Hierarchical>(records: Vec<T>) -> Result<Vec<T>> {
        let mut keyed = records
            .into_iter()
            .map(|record| Ok((record.index_path()?, record.id(), record)))
            .collect::<Result<Vec<(IndexPath, Option<RecordId>, T)>>>()?;
        keyed.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));
        Ok(keyed.into_iter().map(|(_, _, record)| record).collect())
    }

    /// Assembles sorted records under a synthetic root.
    ///
    /// Top-level records become the root's children.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Integrity`] if any record is left unconsumed, which
    /// means the input was unsorted or references ids it does not contain.
    /// Returns [`Error::InvalidParent`] if an attached record has no id.
    pub fn assemble<T: Hierarchical>(records: Vec<T>) -> Result<Tree<T>> {
        let mut tree = Tree::new(None);
        let root = tree.root();
        Self::consume(&mut tree, root, String::new(), records)?;
        Ok(tree)
    }

    /// Assembles sorted descendants of `root` under it.
    ///
    /// # Errors
    ///
    /// As [`TreeAssembler::assemble`]; also [`Error::InvalidParent`] if
    /// `root` has no id.
    pub fn assemble_under<T: Hierarchical>(root: T, records: Vec<T>) -> Result<Tree<T>> {
        let expected = root.my_path()?;
        let mut tree = Tree::new(Some(root));
        let root = tree.root();
        Self::consume(&mut tree, root, expected, records)?;
        Ok(tree)
    }

    fn consume<T: Hierarchical>(
        tree: &mut Tree<T>,
        root: NodeId,
        root_path: String,
        records: Vec<T>,
    ) -> Result<()> {
        let total = records.len();
        let mut queue: VecDeque<T> = records.into();
        let mut pending: Vec<(NodeId, String)> = vec![(root, root_path)];

        while let Some((parent, expected)) = pending.pop() {
            let mut attached = Vec::new();
            while queue.front().is_some_and(|next| next.path() == expected) {
                if let Some(record) = queue.pop_front() {
                    let own = record.my_path()?;
                    attached.push((tree.attach(parent, record), own));
                }
            }
            // Reversed so the first child's subtree is consumed first.
            pending.extend(attached.into_iter().rev());
        }

        if let Some(first) = queue.front() {
            let first_id = first.id().map_or_else(|| "none".to_string(), |id| id.to_string());
            log::warn!(
                "tree assembly left {} of {total} record(s) unconsumed",
                queue.len()
            );
            return Err(Error::Integrity {
                details: format!(
                    "{} record(s) left unconsumed, starting with id {first_id} at path '{}'",
                    queue.len(),
                    first.path()
                ),
            });
        }

        log::debug!("assembled {total} record(s) into a tree");
        Ok(())
    }
}
