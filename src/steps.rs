//! The per-operation record of structural events.

use std::fmt;

use crate::node::Node;
use crate::snapshot::Snapshot;

/// What happened at one step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StepKind<K> {
    /// A new leaf holding the key was linked in.
    NodeCreated(K),
    /// The node holding the key was unlinked and replaced by its only child
    /// (or by nothing).
    NodeRemoved(K),
    /// A two-child node took its in-order successor's key.
    ValueReplaced { removed: K, promoted: K },
    /// Left rotation; the pivot is the node that moved down.
    RotateLeft(K),
    /// Right rotation; the pivot is the node that moved down.
    RotateRight(K),
    InsertionComplete,
    DeletionComplete,
}

impl<K> StepKind<K> {
    pub fn description(&self) -> &'static str {
        match self {
            StepKind::NodeCreated(_) => "node created",
            StepKind::NodeRemoved(_) => "node removed",
            StepKind::ValueReplaced { .. } => "value replaced",
            StepKind::RotateLeft(_) => "left rotate",
            StepKind::RotateRight(_) => "right rotate",
            StepKind::InsertionComplete => "insertion complete",
            StepKind::DeletionComplete => "deletion complete",
        }
    }

    pub fn is_rotation(&self) -> bool {
        matches!(self, StepKind::RotateLeft(_) | StepKind::RotateRight(_))
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, StepKind::InsertionComplete | StepKind::DeletionComplete)
    }
}

impl<K: fmt::Display> fmt::Display for StepKind<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = self.description();
        match self {
            StepKind::NodeCreated(k)
            | StepKind::NodeRemoved(k)
            | StepKind::RotateLeft(k)
            | StepKind::RotateRight(k) => write!(f, "{desc} ({k})"),
            StepKind::ValueReplaced { removed, promoted } => {
                write!(f, "{desc} ({removed} -> {promoted})")
            }
            StepKind::InsertionComplete | StepKind::DeletionComplete => f.write_str(desc),
        }
    }
}

/// A snapshot of the whole tree paired with the event that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Step<K> {
    snapshot: Snapshot<K>,
    kind: StepKind<K>,
}

impl<K> Step<K> {
    pub fn snapshot(&self) -> &Snapshot<K> {
        &self.snapshot
    }

    pub fn kind(&self) -> &StepKind<K> {
        &self.kind
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }
}

impl<K: fmt::Display> fmt::Display for Step<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        write!(f, "{}", self.snapshot)
    }
}

/// Append-only list of steps for a single insert or delete.
///
/// Entries are never reordered or individually removed; [`clear`](Self::clear)
/// is the only way out.
#[derive(Clone, Debug)]
pub struct StepLog<K> {
    entries: Vec<Step<K>>,
}

impl<K> StepLog<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn entries(&self) -> &[Step<K>] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Step<K>> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step<K>> {
        self.entries.iter()
    }
}

impl<K: Clone> StepLog<K> {
    /// Capture `root` and append it with `kind`.
    pub fn record(&mut self, root: Option<&Node<K>>, kind: StepKind<K>) {
        self.entries.push(Step {
            snapshot: Snapshot::capture(root),
            kind,
        });
    }
}

impl<K> Default for StepLog<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K> IntoIterator for &'a StepLog<K> {
    type Item = &'a Step<K>;
    type IntoIter = std::slice::Iter<'a, Step<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
