use core::fmt;

/// Index standing in for every missing child and for the root's parent.
///
/// It never addresses an arena slot, so it can never be written through.
pub(crate) const NIL: usize = usize::MAX;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black children
/// - All paths from a node to the leaves below it have equal black node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red node, never the parent of another red node
    Red,
    /// Black node, counted by the black height
    Black,
}

impl Color {
    /// Single-letter tag used by the tree dump, `R` or `B`
    pub const fn as_char(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Black => 'B',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A node in the arena holding the key and its tree links.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// The stored key, never mutated after insertion
    pub(crate) key: K,

    /// Index of the parent node (`NIL` for the root)
    pub(crate) parent: usize,

    /// Index of the left child (`NIL` if absent)
    pub(crate) left: usize,

    /// Index of the right child (`NIL` if absent)
    pub(crate) right: usize,

    pub(crate) color: Color,
}

impl<K> Node<K> {
    /// A fresh red leaf, the only shape structural insert ever creates.
    pub(crate) const fn leaf(key: K, parent: usize) -> Self {
        Self {
            key,
            parent,
            left: NIL,
            right: NIL,
            color: Color::Red,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn child_mut(&mut self, side: Side) -> &mut usize {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
