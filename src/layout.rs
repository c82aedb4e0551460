//! Screen placement for a [`Snapshot`].
//!
//! This is a reference implementation for renderers: the root sits at the top
//! centre and each level down halves the horizontal offset between a parent
//! and its children. Renderers are free to lay snapshots out any other way;
//! the tree itself never depends on this module.

use crate::snapshot::{Snapshot, SnapshotNode};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LayoutConfig {
    /// X coordinate of the root.
    pub center_x: f64,
    /// Y coordinate of the root.
    pub top_y: f64,
    /// Horizontal distance from the root to each of its children.
    pub spread: f64,
    /// Vertical distance between levels.
    pub level_gap: f64,
    /// Node circle radius, used for hit-testing.
    pub radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_x: 400.0,
            top_y: 40.0,
            spread: 200.0,
            level_gap: 60.0,
            radius: 20.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode<'a, K> {
    pub key: &'a K,
    pub x: f64,
    pub y: f64,
    pub depth: u32,
}

/// Parent to child, as indices into [`Layout::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub parent: usize,
    pub child: usize,
}

/// Positioned nodes in pre-order (node, left subtree, right subtree).
#[derive(Clone, Debug)]
pub struct Layout<'a, K> {
    nodes: Vec<PlacedNode<'a, K>>,
    edges: Vec<Edge>,
    radius: f64,
}

impl<'a, K> Layout<'a, K> {
    pub fn compute(snapshot: &'a Snapshot<K>, config: &LayoutConfig) -> Self {
        let mut layout = Layout {
            nodes: Vec::with_capacity(snapshot.len()),
            edges: Vec::new(),
            radius: config.radius,
        };
        if let Some(root) = snapshot.root() {
            layout.place(root, config.center_x, config.top_y, config.spread, 0, config);
        }
        layout
    }

    fn place(
        &mut self,
        node: &'a SnapshotNode<K>,
        x: f64,
        y: f64,
        offset: f64,
        depth: u32,
        config: &LayoutConfig,
    ) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(PlacedNode {
            key: node.key(),
            x,
            y,
            depth,
        });

        let y = y + config.level_gap;
        if let Some(left) = node.left() {
            let child = self.place(left, x - offset, y, offset / 2.0, depth + 1, config);
            self.edges.push(Edge { parent: idx, child });
        }
        if let Some(right) = node.right() {
            let child = self.place(right, x + offset, y, offset / 2.0, depth + 1, config);
            self.edges.push(Edge { parent: idx, child });
        }
        idx
    }

    pub fn nodes(&self) -> &[PlacedNode<'a, K>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The node whose circle contains `(x, y)`. Where circles overlap the
    /// one placed last wins.
    pub fn hit(&self, x: f64, y: f64) -> Option<&PlacedNode<'a, K>> {
        self.nodes
            .iter()
            .rev()
            .find(|n| (n.x - x).hypot(n.y - y) <= self.radius)
    }
}
