use super::OrderedMultiset;
use crate::raw::RawOrderedMultiset;

impl<T> OrderedMultiset<T> {
    /// Creates an empty multiset with room for at least `capacity` distinct values.
    ///
    /// Duplicates of a value already present never need extra room.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset: OrderedMultiset<i32> = OrderedMultiset::with_capacity(16);
    /// assert!(multiset.is_empty());
    /// assert!(multiset.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMultiset {
            raw: RawOrderedMultiset::with_capacity(capacity),
        }
    }

    /// Returns the number of distinct values the multiset can hold without
    /// reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::with_capacity(4);
    /// let capacity = multiset.capacity();
    /// for _ in 0..100 {
    ///     multiset.insert("same");
    /// }
    /// assert_eq!(multiset.capacity(), capacity);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
