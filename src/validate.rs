use ahash::RandomState;
use core::fmt;
use hashbrown::HashSet;
use log::debug;
use num_traits::Float;

use crate::{
    RbTree,
    utils::{Color, NIL},
};

/// A broken structural or coloring rule found by [`RbTree::validate`].
///
/// Node positions are arena indices, useful only to compare reports from the
/// same tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key is not strictly between the bounds set by its ancestors
    OutOfOrder {
        /// Arena index of the misplaced node
        node: usize,
    },
    /// The root is red
    RedRoot,
    /// A red node has a red child
    RedRedEdge {
        /// Arena index of the red child
        node: usize,
    },
    /// The two subtrees of a node differ in black height
    BlackHeightMismatch {
        /// Arena index of the unbalanced node
        node: usize,
        /// Black height below the left child slot
        left: usize,
        /// Black height below the right child slot
        right: usize,
    },
    /// A child does not point back at its parent, or the root has a parent
    BrokenParentLink {
        /// Arena index of the child
        node: usize,
    },
    /// A child link points outside the arena
    DanglingLink {
        /// Arena index of the node holding the link
        node: usize,
    },
    /// A child link leads back to a node already visited
    Cycle {
        /// Arena index of the node linked to twice
        node: usize,
    },
    /// Some arena nodes are not reachable from the root
    LengthMismatch {
        /// Nodes reached from the root
        reachable: usize,
        /// Nodes held by the arena
        stored: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OutOfOrder { node } => write!(f, "node {node} breaks search order"),
            Self::RedRoot => f.write_str("root is red"),
            Self::RedRedEdge { node } => write!(f, "red node {node} has a red parent"),
            Self::BlackHeightMismatch { node, left, right } => write!(
                f,
                "node {node} has black height {left} on the left and {right} on the right"
            ),
            Self::BrokenParentLink { node } => {
                write!(f, "node {node} does not point back at its parent")
            }
            Self::DanglingLink { node } => write!(f, "node {node} links outside the arena"),
            Self::Cycle { node } => write!(f, "node {node} is reachable more than once"),
            Self::LengthMismatch { reachable, stored } => write!(
                f,
                "{reachable} nodes reachable from the root but {stored} stored"
            ),
        }
    }
}

impl core::error::Error for InvariantViolation {}

impl<K> RbTree<K> {
    /// Returns the number of edges on the longest path from the root to a node.
    ///
    /// Both the empty tree and a single key have height 0.
    pub fn height(&self) -> usize {
        self.dump().map(|entry| entry.depth).max().unwrap_or(0)
    }

    /// Returns the number of black nodes on any path from the root down to a
    /// missing child, not counting the root and counting the sentinel itself.
    ///
    /// # Returns
    ///
    /// * `Option<usize>` - The black height, or `None` if the tree is empty
    pub fn black_height(&self) -> Option<usize> {
        if self.root == NIL {
            return None;
        }
        let mut black = 1;
        let mut idx = self.node_at(self.root).left;
        while idx != NIL {
            if !self.is_red(idx) {
                black += 1;
            }
            idx = self.node_at(idx).left;
        }
        Some(black)
    }

    /// Upper bound on [`RbTree::height`] guaranteed by the coloring rules,
    /// `2 * log2(len + 1)`.
    pub fn height_bound(&self) -> f64 {
        2.0 * Float::log2(self.len() as f64 + 1.0)
    }
}

impl<K: Ord> RbTree<K> {
    /// Checks every Red-Black and search-tree rule over the whole tree.
    ///
    /// Runs in O(n). Insertion already calls this in debug builds, so a
    /// failure here means the tree was corrupted.
    ///
    /// # Returns
    ///
    /// * `Result<(), InvariantViolation>` - The first broken rule found, if any
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_arena::RbTree;
    ///
    /// let tree: RbTree<u32> = (0..100).collect();
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let result = self.verify_rb_invariants();
        if let Err(violation) = result {
            debug!("invariant check failed: {violation}");
        }
        result
    }

    fn verify_rb_invariants(&self) -> Result<(), InvariantViolation> {
        if self.root == NIL {
            return match self.nodes.len() {
                0 => Ok(()),
                stored => Err(InvariantViolation::LengthMismatch {
                    reachable: 0,
                    stored,
                }),
            };
        }
        if self.is_red(self.root) {
            return Err(InvariantViolation::RedRoot);
        }
        if self.node_at(self.root).parent != NIL {
            return Err(InvariantViolation::BrokenParentLink { node: self.root });
        }

        let mut visited =
            HashSet::with_capacity_and_hasher(self.nodes.len(), RandomState::default());
        self.verify_subtree(self.root, None, None, &mut visited)?;

        if visited.len() != self.nodes.len() {
            return Err(InvariantViolation::LengthMismatch {
                reachable: visited.len(),
                stored: self.nodes.len(),
            });
        }
        Ok(())
    }

    /// Checks the subtree at `idx`, whose keys must lie strictly between
    /// `lower` and `upper`, and returns its black height counting `idx`.
    fn verify_subtree(
        &self,
        idx: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        visited: &mut HashSet<usize, RandomState>,
    ) -> Result<usize, InvariantViolation> {
        if idx == NIL {
            return Ok(1);
        }
        if !visited.insert(idx) {
            return Err(InvariantViolation::Cycle { node: idx });
        }

        let node = self.node_at(idx);
        if lower.is_some_and(|lower| node.key <= *lower)
            || upper.is_some_and(|upper| node.key >= *upper)
        {
            return Err(InvariantViolation::OutOfOrder { node: idx });
        }

        for child in [node.left, node.right] {
            if child == NIL {
                continue;
            }
            if child >= self.nodes.len() {
                return Err(InvariantViolation::DanglingLink { node: idx });
            }
            if visited.contains(&child) {
                return Err(InvariantViolation::Cycle { node: child });
            }
            if self.node_at(child).parent != idx {
                return Err(InvariantViolation::BrokenParentLink { node: child });
            }
            if node.color == Color::Red && self.is_red(child) {
                return Err(InvariantViolation::RedRedEdge { node: child });
            }
        }

        let left = self.verify_subtree(node.left, lower, Some(&node.key), visited)?;
        let right = self.verify_subtree(node.right, Some(&node.key), upper, visited)?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch {
                node: idx,
                left,
                right,
            });
        }

        Ok(left + usize::from(node.color == Color::Black))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use assert_approx_eq::assert_approx_eq;

    fn sample() -> RbTree<i32> {
        [50, 25, 75, 12, 37, 62, 87, 6, 18, 31, 43].into_iter().collect()
    }

    fn index_of(tree: &RbTree<i32>, key: i32) -> usize {
        tree.nodes
            .iter()
            .position(|node| node.key == key)
            .unwrap()
    }

    #[test]
    fn test_valid_trees_pass() {
        assert_eq!(RbTree::<i32>::new().validate(), Ok(()));
        assert_eq!(sample().validate(), Ok(()));
        assert_eq!((0..256).collect::<RbTree<i32>>().validate(), Ok(()));
    }

    #[test]
    fn test_detects_red_root() {
        let mut tree = sample();
        let root = tree.root;
        tree.nodes[root].color = Color::Red;
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRoot));
    }

    #[test]
    fn test_detects_red_red_edge() {
        let mut tree: RbTree<i32> = [20, 10, 30, 5].into_iter().collect();
        let ten = index_of(&tree, 10);
        let five = index_of(&tree, 5);
        tree.nodes[ten].color = Color::Red;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::RedRedEdge { node: five })
        );
    }

    #[test]
    fn test_detects_black_height_mismatch() {
        let mut tree: RbTree<i32> = [10, 20, 30].into_iter().collect();
        let ten = index_of(&tree, 10);
        tree.nodes[ten].color = Color::Black;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::BlackHeightMismatch {
                node: tree.root,
                left: 2,
                right: 1,
            })
        );
    }

    #[test]
    fn test_detects_out_of_order_key() {
        let mut tree = sample();
        let idx = index_of(&tree, 31);
        tree.nodes[idx].key = 60;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::OutOfOrder { node: idx })
        );
    }

    #[test]
    fn test_detects_broken_parent_link() {
        let mut tree = sample();
        let idx = index_of(&tree, 6);
        tree.nodes[idx].parent = tree.root;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::BrokenParentLink { node: idx })
        );
    }

    #[test]
    fn test_detects_unreachable_node() {
        let mut tree: RbTree<i32> = [20, 10, 30, 5].into_iter().collect();
        let ten = index_of(&tree, 10);
        tree.nodes[ten].left = NIL;
        tree.nodes[ten].color = Color::Black;
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::LengthMismatch {
                reachable: 3,
                stored: 4,
            })
        );
    }

    #[test]
    fn test_detects_cycle() {
        let mut tree: RbTree<i32> = [20, 10, 30, 5].into_iter().collect();
        let five = index_of(&tree, 5);
        let ten = index_of(&tree, 10);
        tree.nodes[five].right = ten;
        assert_eq!(tree.validate(), Err(InvariantViolation::Cycle { node: ten }));
    }

    #[test]
    fn test_violation_display() {
        assert_eq!(InvariantViolation::RedRoot.to_string(), "root is red");
        assert_eq!(
            InvariantViolation::LengthMismatch {
                reachable: 3,
                stored: 4
            }
            .to_string(),
            "3 nodes reachable from the root but 4 stored"
        );
    }

    #[test]
    fn test_height_and_black_height() {
        let empty = RbTree::<i32>::new();
        assert_eq!(empty.height(), 0);
        assert_eq!(empty.black_height(), None);

        let single: RbTree<i32> = [1].into_iter().collect();
        assert_eq!(single.height(), 0);
        assert_eq!(single.black_height(), Some(1));

        let seven: RbTree<i32> = (1..=7).collect();
        assert_eq!(seven.height(), 3);
        assert_eq!(seven.black_height(), Some(2));
    }

    #[test]
    fn test_height_bound() {
        assert_approx_eq!(RbTree::<i32>::new().height_bound(), 0.0);

        let seven: RbTree<i32> = (1..=7).collect();
        assert_approx_eq!(seven.height_bound(), 6.0);

        let big: RbTree<i32> = (0..1023).collect();
        assert_approx_eq!(big.height_bound(), 20.0);
        assert!(big.height() as f64 <= big.height_bound());
    }
}
