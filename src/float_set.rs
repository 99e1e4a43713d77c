use ordered_float::{FloatCore, OrderedFloat};

use crate::{InvariantViolation, RbTree};

/// An insert-only set of floating point values backed by [`RbTree`].
///
/// Values are wrapped in [`OrderedFloat`] for a total order: every NaN is
/// equal to every other NaN and greater than all other values, and `-0.0`
/// equals `0.0`.
///
/// # Examples
///
/// ```
/// use rb_arena::FloatSet;
///
/// let mut set = FloatSet::new();
/// for value in [2.5, -1.0, f64::NAN, 2.5] {
///     set.insert(value);
/// }
///
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(f64::NAN));
/// assert_eq!(set.min(), Some(-1.0));
/// ```
#[derive(Debug, Clone)]
pub struct FloatSet<T>(RbTree<OrderedFloat<T>>);

impl<T> Default for FloatSet<T> {
    fn default() -> Self {
        Self(RbTree::new())
    }
}

impl<T: FloatCore> FloatSet<T> {
    /// Creates an empty set without allocating.
    pub const fn new() -> Self {
        Self(RbTree::new())
    }

    /// Creates an empty set with room for `capacity` values.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of values to pre-allocate nodes for
    pub fn with_capacity(capacity: usize) -> Self {
        Self(RbTree::with_capacity(capacity))
    }

    /// Inserts `value`, returning `true` if it was not already present.
    pub fn insert(&mut self, value: T) -> bool {
        self.0.insert(OrderedFloat(value))
    }

    /// Returns `true` if the set holds a value equal to `value`.
    pub fn contains(&self, value: T) -> bool {
        self.0.contains(&OrderedFloat(value))
    }

    /// Returns the number of distinct values.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the smallest value, or `None` if the set is empty.
    pub fn min(&self) -> Option<T> {
        self.0.min().map(|value| value.into_inner())
    }

    /// Returns the largest value, or `None` if the set is empty.
    pub fn max(&self) -> Option<T> {
        self.0.max().map(|value| value.into_inner())
    }

    /// Returns an iterator over the values in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.0.iter().map(|value| value.into_inner())
    }

    /// Removes every value, keeping the allocation.
    pub fn reset(&mut self) {
        self.0.reset();
    }

    /// Returns the height of the underlying tree, see [`RbTree::height`].
    pub fn height(&self) -> usize {
        self.0.height()
    }

    /// Checks the underlying tree, see [`RbTree::validate`].
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.0.validate()
    }

    /// Returns the underlying tree for structural inspection.
    pub const fn as_tree(&self) -> &RbTree<OrderedFloat<T>> {
        &self.0
    }
}

impl<T: FloatCore> Extend<T> for FloatSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(OrderedFloat));
    }
}

impl<T: FloatCore> FromIterator<T> for FloatSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(OrderedFloat).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_float_set_creation() {
        let set = FloatSet::<f64>::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert!(set.min().is_none());
        assert!(set.max().is_none());
    }

    #[test]
    fn test_floating_point_precision() {
        let mut set = FloatSet::new();

        assert!(set.insert(0.1 + 0.2));
        assert!(set.insert(0.3));
        assert_eq!(set.len(), 2);
        assert!(set.contains(0.3));
        assert!(!set.contains(0.4));
    }

    #[test]
    fn test_infinity_values() {
        let set: FloatSet<f64> = [1.0, f64::INFINITY, f64::NEG_INFINITY, 2.0]
            .into_iter()
            .collect();

        assert_eq!(set.len(), 4);
        assert_eq!(set.min(), Some(f64::NEG_INFINITY));
        assert_eq!(set.max(), Some(f64::INFINITY));
    }

    #[test]
    fn test_extreme_values_and_signed_zero() {
        let mut set = FloatSet::new();
        set.insert(f64::MIN);
        set.insert(f64::MAX);
        set.insert(0.0);
        assert!(!set.insert(-0.0));

        assert_eq!(set.len(), 3);
        assert_eq!(set.min(), Some(f64::MIN));
        assert_eq!(set.max(), Some(f64::MAX));
    }

    #[test]
    fn test_nan_handling() {
        let mut set = FloatSet::new();

        set.insert(1.0_f32);
        assert!(set.insert(f32::NAN));
        assert!(!set.insert(f32::NAN));
        set.insert(2.0);

        assert_eq!(set.len(), 3);
        assert!(set.contains(f32::NAN));
        assert_eq!(set.min(), Some(1.0));
        assert!(set.max().is_some_and(f32::is_nan));
        assert_eq!(set.validate(), Ok(()));
    }

    #[test]
    fn test_iter_sorted_and_reset() {
        let mut set = FloatSet::with_capacity(8);
        set.extend([0.5, -3.25, 10.0, 0.5, 7.75]);

        assert_eq!(set.iter().collect::<Vec<_>>(), [-3.25, 0.5, 7.75, 10.0]);
        assert_eq!(set.as_tree().len(), 4);
        assert!(set.height() <= 2);

        set.reset();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
