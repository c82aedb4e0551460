//! Frozen copies of a tree shape.
//!
//! A [`Snapshot`] owns a full deep copy of the nodes reachable from the root
//! it was captured from. Nothing is shared with the live tree or with any
//! other snapshot, so later mutation of the source can never show through.

use std::fmt;

use crate::node::Node;

/// One vertex of a [`Snapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SnapshotNode<K> {
    key: K,
    height: u32,
    left: Option<Box<SnapshotNode<K>>>,
    right: Option<Box<SnapshotNode<K>>>,
}

impl<K> SnapshotNode<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Height of this subtree as it stood at capture time.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn left(&self) -> Option<&SnapshotNode<K>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&SnapshotNode<K>> {
        self.right.as_deref()
    }

    fn len(&self) -> usize {
        1 + self.left().map_or(0, Self::len) + self.right().map_or(0, Self::len)
    }

    fn collect_keys<'a>(&'a self, out: &mut Vec<&'a K>) {
        if let Some(l) = self.left() {
            l.collect_keys(out);
        }
        out.push(&self.key);
        if let Some(r) = self.right() {
            r.collect_keys(out);
        }
    }
}

/// Immutable deep copy of a tree shape at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot<K> {
    root: Option<Box<SnapshotNode<K>>>,
}

impl<K: Clone> Snapshot<K> {
    /// Deep-copy the subtree rooted at `root`, or an empty snapshot for `None`.
    ///
    /// Heights are recomputed from the copied structure rather than read from
    /// the source's caches. When the source is settled the two agree; when a
    /// capture happens mid-rebalance, ancestors above the rotation still hold
    /// their previous cached heights and the recomputed values keep the
    /// snapshot self-consistent.
    pub fn capture(root: Option<&Node<K>>) -> Self {
        Self {
            root: root.map(copy_node),
        }
    }
}

fn copy_node<K: Clone>(node: &Node<K>) -> Box<SnapshotNode<K>> {
    let left = node.left().map(copy_node);
    let right = node.right().map(copy_node);
    let height = 1 + left
        .as_ref()
        .map_or(0, |n| n.height)
        .max(right.as_ref().map_or(0, |n| n.height));
    Box::new(SnapshotNode {
        key: node.key().clone(),
        height,
        left,
        right,
    })
}

impl<K> Snapshot<K> {
    pub const fn empty() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&SnapshotNode<K>> {
        self.root.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes. Walks the whole copy.
    pub fn len(&self) -> usize {
        self.root().map_or(0, SnapshotNode::len)
    }

    pub fn height(&self) -> u32 {
        self.root().map_or(0, SnapshotNode::height)
    }

    /// Keys in in-order sequence.
    pub fn keys(&self) -> Vec<&K> {
        let mut out = Vec::new();
        if let Some(root) = self.root() {
            root.collect_keys(&mut out);
        }
        out
    }
}

impl<K> Default for Snapshot<K> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Sideways text rendering: right subtree above its parent, left below.
///
/// ```text
///     /-- 30
/// 20
///     \-- 10
/// ```
impl<K: fmt::Display> fmt::Display for Snapshot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            None => writeln!(f, "(empty)"),
            Some(root) => render(f, root, "", None),
        }
    }
}

fn render<K: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    node: &SnapshotNode<K>,
    indent: &str,
    branch: Option<&str>,
) -> fmt::Result {
    let child_indent = format!("{indent}    ");
    if let Some(r) = node.right() {
        render(f, r, &child_indent, Some("/-- "))?;
    }
    writeln!(f, "{indent}{}{}", branch.unwrap_or(""), node.key)?;
    if let Some(l) = node.left() {
        render(f, l, &child_indent, Some("\\-- "))?;
    }
    Ok(())
}
