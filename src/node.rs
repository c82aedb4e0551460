//! Live tree vertices.
//!
//! Nodes are owned exclusively through `Option<Box<Node<K>>>` links, so the
//! live tree can never share a vertex with another tree or with a snapshot.
//! Only [`AvlTree`](crate::AvlTree) rewires links; everyone else gets a
//! read-only view.

pub(crate) type Link<K> = Option<Box<Node<K>>>;

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// A vertex of the live tree.
#[derive(Debug)]
pub struct Node<K> {
    pub(crate) key: K,
    pub(crate) left: Link<K>,
    pub(crate) right: Link<K>,
    /// Cached `1 + max(height(left), height(right))`.
    pub(crate) height: u32,
}

impl<K> Node<K> {
    /// A fresh leaf. Height 1 is valid immediately.
    pub(crate) fn leaf(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            height: 1,
        })
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn left(&self) -> Option<&Node<K>> {
        self.left.as_deref()
    }

    #[inline]
    pub fn right(&self) -> Option<&Node<K>> {
        self.right.as_deref()
    }

    #[inline]
    pub fn child(&self, side: Side) -> Option<&Node<K>> {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `height(left) - height(right)`.
    #[inline]
    pub fn balance(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Link<K> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[inline]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Number of present children (0, 1 or 2).
    #[inline]
    pub(crate) fn degree(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }
}

#[inline]
pub(crate) fn height<K>(link: &Link<K>) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

/// Right rotation around `y`; returns the new subtree head (`y`'s old left).
///
/// ```text
///       y            x
///      / \          / \
///     x   C  ==>   A   y
///    / \              / \
///   A   B            B   C
/// ```
pub(crate) fn rotate_right<K>(mut y: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut x) = y.left.take() else {
        debug_assert!(false, "right rotation needs a left child");
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Mirror of [`rotate_right`].
pub(crate) fn rotate_left<K>(mut x: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut y) = x.right.take() else {
        debug_assert!(false, "left rotation needs a right child");
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}
