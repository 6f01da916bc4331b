//! In-memory trees rebuilt from flat record sets.
//!
//! A [`Tree`] is an arena: nodes live in one vector and refer to each other
//! by [`NodeId`]. Parents own their children through the ordered child list;
//! the parent link is a plain index used for lookups only. Nodes are added
//! exclusively by attaching them under an existing node.
//!
//! # Examples
//!
//! ```
//! use matpath::{Hierarchical, Record, RecordId, TreeAssembler};
//! use serde_json::Value;
//!
//! let id = |v: i64| RecordId::try_from(v).unwrap();
//! let records = vec![
//!     Record::persisted(id(1), "", Value::Null),
//!     Record::persisted(id(2), "", Value::Null),
//!     Record::persisted(id(3), "1", Value::Null),
//! ];
//!
//! let tree = TreeAssembler::assemble(records).unwrap();
//! let top: Vec<_> = tree
//!     .children(tree.root())
//!     .iter()
//!     .map(|&n| tree.content(n).unwrap().id().unwrap().value())
//!     .collect();
//! assert_eq!(top, [1, 2]);
//! ```

pub mod assembler;

#[cfg(test)]
mod proptests;

pub use assembler::TreeAssembler;

use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena slot of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A node of a [`Tree`].
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    content: Option<T>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl<T> TreeNode<T> {
    /// Returns the wrapped record, or `None` for a synthetic root.
    #[must_use]
    pub const fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }

    /// Returns the parent node, or `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the children in attachment order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A rooted, ordered tree of records.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<TreeNode<T>>,
}

impl<T> Tree<T> {
    /// Creates a tree holding only a root node.
    ///
    /// A `None` root is synthetic: it stands above all top-level records.
    #[must_use]
    pub fn new(root: Option<T>) -> Self {
        Self {
            nodes: vec![TreeNode {
                content: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Attaches `content` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub(crate) fn attach(&mut self, parent: NodeId, content: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            content: Some(content),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns the root node id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns a node, or `None` if `id` belongs to another tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.nodes.get(id.0)
    }

    /// Returns the record held by a node.
    #[must_use]
    pub fn content(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(TreeNode::content)
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(TreeNode::parent)
    }

    /// Returns the children of a node, empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Returns the number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns every node in depth-first pre-order, root first.
    #[must_use]
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    /// Visits every node depth-first, children before their parent.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(NodeId, &TreeNode<T>),
    {
        let mut stack = vec![(self.root(), false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                visit(id, &self.nodes[id.0]);
            } else {
                stack.push((id, true));
                stack.extend(self.children(id).iter().rev().map(|&child| (child, false)));
            }
        }
    }

    /// Returns the records in depth-first pre-order, skipping a synthetic root.
    #[must_use]
    pub fn contents(&self) -> Vec<&T> {
        self.pre_order()
            .into_iter()
            .filter_map(|id| self.content(id))
            .collect()
    }
}

struct NodeView<'a, T> {
    tree: &'a Tree<T>,
    id: NodeId,
}

struct ChildrenView<'a, T> {
    tree: &'a Tree<T>,
    children: &'a [NodeId],
}

impl<T: Serialize> Serialize for NodeView<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TreeNode", 2)?;
        state.serialize_field("content", &self.tree.content(self.id))?;
        state.serialize_field(
            "children",
            &ChildrenView {
                tree: self.tree,
                children: self.tree.children(self.id),
            },
        )?;
        state.end()
    }
}

impl<T: Serialize> Serialize for ChildrenView<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.children.len()))?;
        for &id in self.children {
            seq.serialize_element(&NodeView {
                tree: self.tree,
                id,
            })?;
        }
        seq.end()
    }
}

/// Serializes as nested `{ "content": …, "children": [ … ] }` objects.
impl<T: Serialize> Serialize for Tree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeView {
            tree: self,
            id: self.root(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> (Tree<&'static str>, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new(None);
        let a = tree.attach(tree.root(), "a");
        let b = tree.attach(tree.root(), "b");
        let c = tree.attach(a, "c");
        (tree, a, b, c)
    }

    #[test]
    fn test_attach_sets_parent_and_order() {
        let (tree, a, b, c) = sample();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.children(tree.root()), &[a, b]);
        assert_eq!(tree.children(a), &[c]);
        assert_eq!(tree.parent(c), Some(a));
        assert_eq!(tree.parent(a), Some(tree.root()));
        assert_eq!(tree.parent(tree.root()), None);
        assert_eq!(tree.content(tree.root()), None);
        assert_eq!(tree.content(c), Some(&"c"));
    }

    #[test]
    fn test_pre_order_and_contents() {
        let (tree, a, b, c) = sample();
        assert_eq!(tree.pre_order(), vec![tree.root(), a, c, b]);
        assert_eq!(tree.contents(), vec![&"a", &"c", &"b"]);
    }

    #[test]
    fn test_traverse_is_post_order() {
        let (tree, ..) = sample();
        let mut seen = Vec::new();
        tree.traverse(|_, node| seen.push(node.content().copied().unwrap_or("root")));
        assert_eq!(seen, vec!["c", "a", "b", "root"]);
    }

    #[test]
    fn test_unknown_node() {
        let (tree, ..) = sample();
        let other = NodeId(99);
        assert!(tree.node(other).is_none());
        assert!(tree.children(other).is_empty());
        assert_eq!(tree.parent(other), None);
    }

    #[test]
    fn test_serialize_nested() {
        let (tree, ..) = sample();
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            value,
            json!({
                "content": null,
                "children": [
                    { "content": "a", "children": [ { "content": "c", "children": [] } ] },
                    { "content": "b", "children": [] }
                ]
            })
        );
    }
}
