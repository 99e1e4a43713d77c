use alloc::vec::Vec;
use core::{borrow::Borrow, cmp::Ordering};

use log::trace;

use crate::utils::{Color, NIL, Node, Side};

/// An insert-only ordered set backed by a Red-Black tree.
///
/// Nodes live in a single arena and refer to each other by index, so the
/// parent back-links never alias ownership. A lookup or insertion walks at most
/// `2 * log2(n + 1)` nodes.
///
/// Key features:
/// - Duplicate inserts are no-ops, each key is stored once
/// - Nodes are never freed; the arena only grows until [`RbTree::reset`]
/// - In-order structural dump for external verification via [`RbTree::dump`]
///
/// # Examples
///
/// ```
/// use rb_arena::RbTree;
///
/// let mut tree = RbTree::new();
/// for key in [10, 20, 30, 20] {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.len(), 3);
/// assert!(tree.contains(&20));
/// assert!(!tree.contains(&25));
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 20, 30]);
/// ```
#[derive(Debug, Clone)]
pub struct RbTree<K> {
    /// Arena of nodes, indexed by the `parent`/`left`/`right` links
    pub(crate) nodes: Vec<Node<K>>,

    /// Index of the root node, `NIL` when the tree is empty
    pub(crate) root: usize,
}

impl<K> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RbTree<K> {
    /// Creates an empty tree without allocating.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NIL,
        }
    }

    /// Creates an empty tree with room for `capacity` keys before the arena
    /// reallocates.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of keys to pre-allocate nodes for
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: NIL,
        }
    }

    /// Returns the number of distinct keys stored in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no key has been inserted since creation or the last reset.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of keys the arena can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Drops every key while keeping the arena allocation for reuse.
    pub fn reset(&mut self) {
        log::debug!("resetting tree of {} keys", self.nodes.len());
        self.nodes.clear();
        self.root = NIL;
    }

    /// Returns the smallest key, or `None` if the tree is empty.
    pub fn min(&self) -> Option<&K> {
        self.extreme(Side::Left)
    }

    /// Returns the largest key, or `None` if the tree is empty.
    pub fn max(&self) -> Option<&K> {
        self.extreme(Side::Right)
    }

    fn extreme(&self, side: Side) -> Option<&K> {
        if self.root == NIL {
            return None;
        }
        let mut node = self.root;
        loop {
            let next = self.node_at(node).child(side);
            if next == NIL {
                return Some(&self.node_at(node).key);
            }
            node = next;
        }
    }

    #[inline]
    pub(crate) fn node_at(&self, idx: usize) -> &Node<K> {
        debug_assert!(idx != NIL, "the sentinel has no node");
        &self.nodes[idx]
    }

    #[inline]
    fn node_at_mut(&mut self, idx: usize) -> &mut Node<K> {
        debug_assert!(idx != NIL, "the sentinel is never mutated");
        &mut self.nodes[idx]
    }

    /// Color of a node, with the sentinel always reporting black.
    #[inline]
    pub(crate) fn color_of(&self, idx: usize) -> Color {
        if idx == NIL {
            Color::Black
        } else {
            self.node_at(idx).color
        }
    }

    #[inline]
    pub(crate) fn is_red(&self, idx: usize) -> bool {
        self.color_of(idx) == Color::Red
    }

    #[inline]
    fn set_color(&mut self, idx: usize, color: Color) {
        self.node_at_mut(idx).color = color;
    }

    #[inline]
    fn parent_of(&self, idx: usize) -> usize {
        self.node_at(idx).parent
    }

    /// Which child slot of `parent` holds `idx`.
    #[inline]
    fn side_of(&self, idx: usize, parent: usize) -> Side {
        if self.node_at(parent).left == idx {
            Side::Left
        } else {
            debug_assert_eq!(self.node_at(parent).right, idx);
            Side::Right
        }
    }

    /// Moves `node` down toward `dir`; the child on the opposite side becomes
    /// the subtree root and hands its inner subtree over to `node`.
    ///
    /// `Side::Left` is a left rotation and needs a real right child, `Side::Right`
    /// the mirror. Keys and colors are left alone.
    fn rotate(&mut self, node: usize, dir: Side) {
        let lift = dir.opposite();
        let pivot = self.node_at(node).child(lift);
        debug_assert!(pivot != NIL, "rotation pivot must be a real node");
        trace!("rotate {dir:?} at node {node}, pivot {pivot}");

        let inner = self.node_at(pivot).child(dir);
        *self.node_at_mut(node).child_mut(lift) = inner;
        if inner != NIL {
            self.node_at_mut(inner).parent = node;
        }

        let parent = self.parent_of(node);
        self.node_at_mut(pivot).parent = parent;
        if parent == NIL {
            self.root = pivot;
        } else {
            let side = self.side_of(node, parent);
            *self.node_at_mut(parent).child_mut(side) = pivot;
        }

        *self.node_at_mut(pivot).child_mut(dir) = node;
        self.node_at_mut(node).parent = pivot;
    }

    /// Restores the color invariants after `node` was attached as a red leaf.
    fn fix_insertion_violations(&mut self, mut node: usize) {
        loop {
            let parent = self.parent_of(node);
            if parent == NIL {
                trace!("fixup: node {node} is the root");
                self.set_color(node, Color::Black);
                return;
            }
            if !self.is_red(parent) {
                return;
            }

            // A red parent is never the root, so the grandparent is real.
            let grandparent = self.parent_of(parent);
            debug_assert!(grandparent != NIL, "red node {parent} has no parent");
            let parent_side = self.side_of(parent, grandparent);
            let uncle = self.node_at(grandparent).child(parent_side.opposite());

            if self.is_red(uncle) {
                trace!("fixup: red uncle {uncle}, recoloring grandparent {grandparent}");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.side_of(node, parent) != parent_side {
                trace!("fixup: zig-zag at node {node}");
                self.rotate(parent, parent_side);
                node = parent;
            }

            trace!("fixup: zig-zig at node {node}");
            let parent = self.parent_of(node);
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, parent_side.opposite());
            return;
        }
    }
}

impl<K: Ord> RbTree<K> {
    /// Descends toward `key`, returning the node holding it or, failing
    /// that, the last real node visited (the would-be parent).
    ///
    /// Returns `None` only for an empty tree.
    fn search<Q>(&self, key: &Q) -> Option<(usize, Ordering)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.root == NIL {
            return None;
        }

        let mut current = self.root;
        loop {
            let node = self.node_at(current);
            let ordering = key.cmp(node.key.borrow());
            let next = match ordering {
                Ordering::Equal => return Some((current, ordering)),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            if next == NIL {
                return Some((current, ordering));
            }
            current = next;
        }
    }

    /// Returns `true` if the tree holds a key equal to `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up, in any form `K` can be borrowed as
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns the stored key equal to `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key)? {
            (idx, Ordering::Equal) => Some(&self.node_at(idx).key),
            _ => None,
        }
    }

    /// Inserts `key`, rebalancing the tree as needed.
    ///
    /// Inserting a key that is already present leaves the tree untouched.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if the key was newly inserted, `false` if it was already present
    pub fn insert(&mut self, key: K) -> bool {
        let found = self.search(&key);
        if let Some((_, Ordering::Equal)) = found {
            return false;
        }

        let new_idx = self.nodes.len();
        match found {
            None => {
                debug_assert!(self.nodes.is_empty(), "search misses only on an empty tree");
                self.nodes.push(Node::leaf(key, NIL));
                self.root = new_idx;
            }
            Some((parent, ordering)) => {
                self.nodes.push(Node::leaf(key, parent));
                let side = if ordering == Ordering::Less {
                    Side::Left
                } else {
                    Side::Right
                };
                *self.node_at_mut(parent).child_mut(side) = new_idx;
            }
        }

        self.fix_insertion_violations(new_idx);

        debug_assert!(
            self.validate().is_ok(),
            "RB tree invariants violated after insertion"
        );

        true
    }
}

impl<K: Ord> Extend<K> for RbTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for RbTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut tree = Self::with_capacity(iter.size_hint().0);
        tree.extend(iter);
        tree
    }
}
