//! Snapshot trees.
//!
//! A [`TreeNode`] is an immutable, annotated capture of a value graph taken
//! at one instant. Nodes keep the live value handle (not a copy) next to the
//! structure observed during the walk; the structure is what gets diffed.
//!
//! ## Guarantees
//!
//! - `items[i].path` is derived from the node path and `keys[i]` by
//!   [`full_path`](crate::path::full_path); sibling paths are unique.
//! - Keys are sorted, so equal data yields identical key sequences.
//! - Ignored paths are absent from `keys` and `items`.
//! - A child that is one of its own ancestors becomes a
//!   [`NodeBody::BackReference`] instead of being expanded again.

pub mod builder;

pub use builder::{build, build_at};

use crate::classify::Kind;
use crate::value::{Key, Value};

/// One node of a snapshot tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Full address from the traversal root
    pub path: String,
    /// Kind tag assigned when the snapshot was taken
    pub kind: Kind,
    /// Live value handle
    pub value: Value,
    pub body: NodeBody,
}

/// Shape-specific part of a [`TreeNode`]
#[derive(Debug, Clone)]
pub enum NodeBody {
    /// Primitive, function or opaque value
    Leaf,
    /// Array, map or object, with one item per key in key order
    Container { keys: Vec<Key>, items: Vec<TreeNode> },
    /// Container that is an ancestor of this position; not expanded
    BackReference,
}

impl TreeNode {
    /// Child count for containers
    pub fn size(&self) -> Option<usize> {
        match &self.body {
            NodeBody::Container { keys, .. } => Some(keys.len()),
            _ => None,
        }
    }

    pub fn keys(&self) -> &[Key] {
        match &self.body {
            NodeBody::Container { keys, .. } => keys,
            _ => &[],
        }
    }

    pub fn items(&self) -> &[TreeNode] {
        match &self.body {
            NodeBody::Container { items, .. } => items,
            _ => &[],
        }
    }

    pub fn is_back_reference(&self) -> bool {
        matches!(self.body, NodeBody::BackReference)
    }

    /// Direct child with exactly this path
    pub fn child_at(&self, path: &str) -> Option<&TreeNode> {
        self.items().iter().find(|item| item.path == path)
    }

    /// Any node in this subtree with exactly this path
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path == path {
            return Some(self);
        }
        self.items().iter().find_map(|item| item.find(path))
    }

    /// Total number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.items().iter().map(TreeNode::node_count).sum::<usize>()
    }
}
