//! # avl-steps
//!
//! An AVL tree that, alongside the usual self-balancing insert and delete,
//! records every structural step an operation takes: node creation, node
//! removal, successor promotion and each individual rotation. Each step
//! carries a deep [`Snapshot`] of the whole tree taken at that instant, so a
//! renderer or replay tool can walk through intermediate shapes, not just the
//! final one.
//!
//! ## Example
//!
//! ```rust
//! use avl_steps::{AvlTree, StepKind};
//!
//! let mut tree = AvlTree::new();
//! tree.insert(10);
//! tree.insert(20);
//! tree.insert(30);
//!
//! let kinds: Vec<_> = tree.steps().iter().map(|s| s.kind().clone()).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         StepKind::NodeCreated(30),
//!         StepKind::RotateLeft(10),
//!         StepKind::InsertionComplete,
//!     ]
//! );
//! assert_eq!(tree.root().map(|n| *n.key()), Some(20));
//! ```
//!
//! The step log only ever describes the most recent call; it is cleared at
//! the start of every `insert` and `delete`.

pub mod layout;
mod node;
pub mod script;
mod snapshot;
mod steps;

pub use layout::{Edge, Layout, LayoutConfig, PlacedNode};
pub use node::{Node, Side};
pub use script::{parse_script, Op, ParseOpError};
pub use snapshot::{Snapshot, SnapshotNode};
pub use steps::{Step, StepKind, StepLog};

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use node::{rotate_left, rotate_right, Link};

/// Which rebalancing case fired at a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fix {
    Right,
    Left,
    LeftRight,
    RightLeft,
}

/// What the unwind is recovering from; selects the rotation rule.
enum Trigger<'a, K> {
    /// Insertion of this key; the case follows where the key went below the
    /// heavy child.
    Insert(&'a K),
    /// Deletion; the case follows the heavy child's own balance.
    Delete,
}

fn pick_fix<K: Ord>(node: &Node<K>, trigger: &Trigger<'_, K>) -> Option<Fix> {
    let balance = node.balance();
    if balance > 1 {
        let heavy = node.left()?;
        let single = match trigger {
            Trigger::Insert(key) => *key < heavy.key(),
            Trigger::Delete => heavy.balance() >= 0,
        };
        Some(if single { Fix::Right } else { Fix::LeftRight })
    } else if balance < -1 {
        let heavy = node.right()?;
        let single = match trigger {
            Trigger::Insert(key) => *key > heavy.key(),
            Trigger::Delete => heavy.balance() <= 0,
        };
        Some(if single { Fix::Left } else { Fix::RightLeft })
    } else {
        None
    }
}

fn child_path(at: &[Side], side: Side) -> Vec<Side> {
    let mut path = Vec::with_capacity(at.len() + 1);
    path.extend_from_slice(at);
    path.push(side);
    path
}

/// A self-balancing binary search tree of unique keys with a replayable
/// step log.
///
/// Descent records the path of [`Side`]s from the root; the post-order fix-up
/// then walks that path back from the deepest ancestor to the root, which is
/// the order a recursive implementation would unwind in. Every mutation goes
/// through the slot that owns the affected subtree, so the tree is fully
/// linked whenever a step is captured.
pub struct AvlTree<K> {
    root: Link<K>,
    log: StepLog<K>,
    count: usize,
}

impl<K> AvlTree<K> {
    pub fn new() -> Self {
        Self {
            root: None,
            log: StepLog::new(),
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Height of the whole tree; 0 when empty.
    #[inline]
    pub fn height(&self) -> u32 {
        node::height(&self.root)
    }

    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_deref()
    }

    /// Steps recorded by the most recent `insert` or `delete`, oldest first.
    pub fn steps(&self) -> &[Step<K>] {
        self.log.entries()
    }

    pub fn step_log(&self) -> &StepLog<K> {
        &self.log
    }

    /// In-order iterator over the keys.
    pub fn iter(&self) -> Iter<'_, K> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root());
        iter
    }

    /// Keys in in-order sequence, collected.
    pub fn keys(&self) -> Vec<&K> {
        self.iter().collect()
    }

    fn node_at(&self, path: &[Side]) -> Option<&Node<K>> {
        path.iter()
            .try_fold(self.root()?, |node, &side| node.child(side))
    }

    /// The link slot reached by following `path` from the root slot. Paths
    /// always come from a prior descent, so they never run past a leaf.
    fn slot_mut(&mut self, path: &[Side]) -> &mut Link<K> {
        path.iter().fold(&mut self.root, |slot, &side| match slot {
            Some(node) => node.child_mut(side),
            None => slot,
        })
    }
}

impl<K: Ord + Clone + fmt::Debug> AvlTree<K> {
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).1
    }

    /// Deep copy of the current shape.
    pub fn snapshot(&self) -> Snapshot<K> {
        Snapshot::capture(self.root())
    }

    /// Insert `key`. Returns `false` (and records only the completion step)
    /// if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.log.clear();

        let (path, found) = self.search(&key);
        if found {
            debug!(?key, "insert skipped, key already present");
            self.record(StepKind::InsertionComplete);
            return false;
        }

        *self.slot_mut(&path) = Some(Node::leaf(key.clone()));
        self.count += 1;
        self.record(StepKind::NodeCreated(key.clone()));

        self.rebalance_path(&path, &Trigger::Insert(&key));
        self.record(StepKind::InsertionComplete);

        debug!(?key, depth = path.len(), steps = self.log.len(), "inserted");
        true
    }

    /// Delete `key`. Returns `false` (and records only the completion step)
    /// if it was absent.
    ///
    /// A node with two children takes its in-order successor's key
    /// ("value replaced") and the successor node is then unlinked in its
    /// place ("node removed").
    pub fn delete(&mut self, key: &K) -> bool {
        self.log.clear();

        let (mut path, found) = self.search(key);
        if !found {
            debug!(?key, "delete skipped, key absent");
            self.record(StepKind::DeletionComplete);
            return false;
        }

        if let Some((successor_path, promoted)) = self.successor_of_full(&path) {
            if let Some(node) = self.slot_mut(&path).as_deref_mut() {
                node.key = promoted.clone();
            }
            self.record(StepKind::ValueReplaced {
                removed: key.clone(),
                promoted,
            });
            path = successor_path;
        }

        if let Some(removed) = self.unlink_at(&path) {
            self.count -= 1;
            self.record(StepKind::NodeRemoved(removed));
        }

        self.rebalance_path(&path, &Trigger::Delete);
        self.record(StepKind::DeletionComplete);

        debug!(?key, steps = self.log.len(), "deleted");
        true
    }

    /// Run one scripted operation.
    pub fn apply(&mut self, op: Op<K>) -> bool {
        match op {
            Op::Insert(key) => self.insert(key),
            Op::Delete(key) => self.delete(&key),
        }
    }

    /// Path from the root to `key` (or to the empty slot where it would go),
    /// and whether it was found.
    fn search(&self, key: &K) -> (Vec<Side>, bool) {
        let mut path = Vec::new();
        let mut cur = self.root();
        while let Some(node) = cur {
            let side = match key.cmp(node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return (path, true),
            };
            path.push(side);
            cur = node.child(side);
        }
        (path, false)
    }

    /// For a node with two children, the path to its in-order successor and
    /// the successor's key.
    fn successor_of_full(&self, at: &[Side]) -> Option<(Vec<Side>, K)> {
        let node = self.node_at(at)?;
        node.left()?;
        let mut cur = node.right()?;
        let mut path = child_path(at, Side::Right);
        while let Some(next) = cur.left() {
            path.push(Side::Left);
            cur = next;
        }
        Some((path, cur.key().clone()))
    }

    /// Replace the node at `at` (which has at most one child) by that child.
    fn unlink_at(&mut self, at: &[Side]) -> Option<K> {
        let slot = self.slot_mut(at);
        let mut node = slot.take()?;
        debug_assert!(node.degree() < 2);
        *slot = node.left.take().or_else(|| node.right.take());
        Some(node.key)
    }

    /// Refresh heights and rebalance every proper ancestor of the slot at
    /// `path`, deepest first.
    fn rebalance_path(&mut self, path: &[Side], trigger: &Trigger<'_, K>) {
        for depth in (0..path.len()).rev() {
            self.rebalance_at(&path[..depth], trigger);
        }
    }

    fn rebalance_at(&mut self, at: &[Side], trigger: &Trigger<'_, K>) {
        let fix = match self.slot_mut(at).as_deref_mut() {
            Some(node) => {
                node.update_height();
                pick_fix(node, trigger)
            }
            None => None,
        };

        match fix {
            None => {}
            Some(Fix::Right) => self.rotate_at(at, Side::Right),
            Some(Fix::Left) => self.rotate_at(at, Side::Left),
            Some(Fix::LeftRight) => {
                self.rotate_at(&child_path(at, Side::Left), Side::Left);
                self.rotate_at(at, Side::Right);
            }
            Some(Fix::RightLeft) => {
                self.rotate_at(&child_path(at, Side::Right), Side::Right);
                self.rotate_at(at, Side::Left);
            }
        }
    }

    /// Rotate the subtree held by the slot at `at` towards `direction`, then
    /// record it. The slot is the tree's root slot when `at` is empty.
    fn rotate_at(&mut self, at: &[Side], direction: Side) {
        let slot = self.slot_mut(at);
        let Some(node) = slot.take() else {
            return;
        };
        let pivot = node.key.clone();
        let (head, kind) = match direction {
            Side::Left => (rotate_left(node), StepKind::RotateLeft(pivot)),
            Side::Right => (rotate_right(node), StepKind::RotateRight(pivot)),
        };
        *slot = Some(head);
        self.record(kind);
    }

    fn record(&mut self, kind: StepKind<K>) {
        trace!(index = self.log.len(), step = kind.description(), "recording step");
        self.log.record(self.root.as_deref(), kind);
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + fmt::Debug> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        for key in iter {
            tree.insert(key);
        }
        tree
    }
}

impl<K: fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Iter<'a, K> {
    fn push_left(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right());
        Some(node.key())
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


#[cfg(test)]
mod proptests;
