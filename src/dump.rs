use alloc::vec::Vec;
use core::{fmt, iter::FusedIterator};

use crate::{
    RbTree,
    utils::{Color, NIL},
};

/// One node of the tree as reported by [`RbTree::dump`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry<'a, K> {
    /// The node's key
    pub key: &'a K,
    /// Key of the left child, `None` if the left child is the sentinel
    pub left: Option<&'a K>,
    /// Key of the right child, `None` if the right child is the sentinel
    pub right: Option<&'a K>,
    /// The node's color
    pub color: Color,
    /// Edges between the root and this node, the root being at depth 0
    pub depth: usize,
}

/// Formats as `key left right color`, writing `null` for a missing child.
impl<K: fmt::Display> fmt::Display for DumpEntry<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.key)?;
        match self.left {
            Some(left) => write!(f, "{left} ")?,
            None => f.write_str("null ")?,
        }
        match self.right {
            Some(right) => write!(f, "{right} ")?,
            None => f.write_str("null ")?,
        }
        write!(f, "{}", self.color)
    }
}

/// In-order walk over the tree's nodes, created by [`RbTree::dump`].
///
/// The walk keeps an explicit stack of the pending left spine, so it never
/// recurses and holds at most `height + 1` entries at a time.
#[derive(Debug, Clone)]
pub struct Dump<'a, K> {
    tree: &'a RbTree<K>,
    /// Pending `(node, depth)` pairs, innermost on top
    stack: Vec<(usize, usize)>,
    remaining: usize,
}

impl<'a, K> Dump<'a, K> {
    fn new(tree: &'a RbTree<K>) -> Self {
        let mut dump = Self {
            tree,
            stack: Vec::new(),
            remaining: tree.len(),
        };
        dump.push_left_spine(tree.root, 0);
        dump
    }

    fn push_left_spine(&mut self, mut idx: usize, mut depth: usize) {
        while idx != NIL {
            self.stack.push((idx, depth));
            idx = self.tree.node_at(idx).left;
            depth += 1;
        }
    }

    fn key_at(&self, idx: usize) -> Option<&'a K> {
        let tree: &'a RbTree<K> = self.tree;
        (idx != NIL).then(|| &tree.node_at(idx).key)
    }
}

impl<'a, K> Iterator for Dump<'a, K> {
    type Item = DumpEntry<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, depth) = self.stack.pop()?;
        let tree: &'a RbTree<K> = self.tree;
        let node = tree.node_at(idx);
        self.push_left_spine(node.right, depth + 1);
        self.remaining -= 1;

        Some(DumpEntry {
            key: &node.key,
            left: self.key_at(node.left),
            right: self.key_at(node.right),
            color: node.color,
            depth,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Dump<'_, K> {}

impl<K> FusedIterator for Dump<'_, K> {}

/// Ascending iterator over the keys of an [`RbTree`], created by [`RbTree::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, K>(Dump<'a, K>);

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|entry| entry.key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> RbTree<K> {
    /// Walks the tree in ascending key order, reporting each node's key, its
    /// children's keys, its color and its depth.
    ///
    /// The walk is lazy and read-only; calling `dump` again starts over.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_arena::{Color, RbTree};
    ///
    /// let tree: RbTree<i32> = [10, 20, 30].into_iter().collect();
    /// let root = tree.dump().find(|entry| entry.depth == 0).unwrap();
    ///
    /// assert_eq!(root.key, &20);
    /// assert_eq!((root.left, root.right), (Some(&10), Some(&30)));
    /// assert_eq!(root.color, Color::Black);
    /// assert_eq!(root.to_string(), "20 10 30 B");
    /// ```
    pub fn dump(&self) -> Dump<'_, K> {
        Dump::new(self)
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter(self.dump())
    }
}

impl<'a, K> IntoIterator for &'a RbTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Writes the number of keys, then one [`DumpEntry`] line per node in order.
impl<K: fmt::Display> fmt::Display for RbTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.len())?;
        for entry in self.dump() {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
