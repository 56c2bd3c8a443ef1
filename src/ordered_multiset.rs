use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::raw::{RawOrderedMultiset, Walk};

mod capacity;
mod order_statistic;

/// An ordered multiset based on an AVL tree.
///
/// Every distinct value is stored once together with its multiplicity, so
/// inserting a value that is already present costs a single descent and never
/// changes the shape of the tree. Each node also caches the number of
/// occurrences in its subtrees, which makes positional access
/// ([`at`](OrderedMultiset::at)) and ranking
/// ([`rank_less_than`](OrderedMultiset::rank_less_than)) O(log n).
///
/// It is a logic error for a value to be modified in such a way that its ordering
/// relative to any other value, as determined by the [`Ord`] trait, changes while it
/// is in the multiset. The behavior resulting from such a logic error is not
/// specified, but will be encapsulated to the `OrderedMultiset` that observed the
/// logic error and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use avl_multiset::OrderedMultiset;
///
/// let mut words = OrderedMultiset::new();
///
/// for word in "the cat sat on the mat".split(' ') {
///     words.insert(word);
/// }
///
/// assert_eq!(words.len(), 6);
/// assert_eq!(words.count("the"), 2);
/// assert_eq!(words.at(-1), Ok(&"the"));
///
/// // Remove a single occurrence.
/// words.remove("the");
/// assert_eq!(words.count("the"), 1);
///
/// for word in &words {
///     println!("{word}");
/// }
/// ```
///
/// An `OrderedMultiset` with a known list of values can be initialized from an array:
///
/// ```
/// use avl_multiset::OrderedMultiset;
///
/// let multiset = OrderedMultiset::from([3, 1, 3]);
/// assert_eq!(multiset.count(&3), 2);
/// ```
pub struct OrderedMultiset<T> {
    raw: RawOrderedMultiset<T>,
}

/// An iterator over every occurrence in an `OrderedMultiset`, in ascending order.
///
/// A value with multiplicity `n` is yielded `n` times in a row.
///
/// This `struct` is created by the [`iter`] method on [`OrderedMultiset`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use avl_multiset::OrderedMultiset;
///
/// let multiset = OrderedMultiset::from([2, 1, 2]);
/// let mut iter = multiset.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OrderedMultiset::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    walk: Walk<'a, T>,
    // The value currently being repeated and how many times it is still owed.
    front: Option<(&'a T, usize)>,
    remaining: usize,
}

/// An iterator over the distinct values of an `OrderedMultiset`, in ascending order.
///
/// This `struct` is created by the [`iter_unique`] method on [`OrderedMultiset`].
/// See its documentation for more.
///
/// [`iter_unique`]: OrderedMultiset::iter_unique
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct UniqueIter<'a, T: 'a> {
    walk: Walk<'a, T>,
    remaining: usize,
}

/// An iterator over the distinct values of an `OrderedMultiset` paired with their
/// multiplicities, in ascending order.
///
/// This `struct` is created by the [`counts`] method on [`OrderedMultiset`].
/// See its documentation for more.
///
/// [`counts`]: OrderedMultiset::counts
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Counts<'a, T: 'a> {
    walk: Walk<'a, T>,
    remaining: usize,
}

/// Renders the internal tree of an `OrderedMultiset`.
///
/// This `struct` is created by the [`structure`] method on [`OrderedMultiset`].
/// See its documentation for more.
///
/// [`structure`]: OrderedMultiset::structure
pub struct Structure<'a, T> {
    multiset: &'a OrderedMultiset<T>,
}

impl<T> OrderedMultiset<T> {
    /// Makes a new, empty `OrderedMultiset`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let mut multiset: OrderedMultiset<i32> = OrderedMultiset::new();
    /// assert!(multiset.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> OrderedMultiset<T> {
        OrderedMultiset {
            raw: RawOrderedMultiset::new(),
        }
    }

    /// Returns the number of occurrences in the multiset, duplicates included.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([1, 1, 2]);
    /// assert_eq!(multiset.len(), 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the multiset contains no occurrences.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::new();
    /// assert!(multiset.is_empty());
    /// multiset.insert(1);
    /// assert!(!multiset.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the multiset, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::from([1, 1]);
    /// multiset.clear();
    /// assert!(multiset.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the smallest value in the multiset, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([3, 1, 2]);
    /// assert_eq!(multiset.first(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns a reference to the largest value in the multiset, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([3, 1, 2]);
    /// assert_eq!(multiset.last(), Some(&3));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Gets an iterator that visits every occurrence in ascending order.
    ///
    /// Each call starts a fresh traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([3, 1, 3]);
    /// let values: Vec<_> = multiset.iter().copied().collect();
    /// assert_eq!(values, [1, 3, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            walk: self.raw.walk(),
            front: None,
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator that visits each distinct value once, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([3, 1, 3]);
    /// let values: Vec<_> = multiset.iter_unique().copied().collect();
    /// assert_eq!(values, [1, 3]);
    /// ```
    pub fn iter_unique(&self) -> UniqueIter<'_, T> {
        UniqueIter {
            walk: self.raw.walk(),
            remaining: self.raw.distinct_len(),
        }
    }

    /// Gets an iterator over each distinct value and its multiplicity, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from(['b', 'a', 'b']);
    /// let counts: Vec<_> = multiset.counts().collect();
    /// assert_eq!(counts, [(&'a', 1), (&'b', 2)]);
    /// ```
    pub fn counts(&self) -> Counts<'_, T> {
        Counts {
            walk: self.raw.walk(),
            remaining: self.raw.distinct_len(),
        }
    }

    /// Returns a [`Display`](fmt::Display) adapter that prints the internal tree,
    /// one node per line in ascending order, indented two spaces per level.
    ///
    /// Each line reads `value: left < count > right`, where `left` and `right` are
    /// the number of occurrences stored in the node's subtrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([20, 10, 30, 10]);
    /// assert_eq!(
    ///     multiset.structure().to_string(),
    ///     "  10: 0 < 2 > 0\n20: 2 < 1 > 1\n  30: 0 < 1 > 0\n",
    /// );
    ///
    /// let empty: OrderedMultiset<i32> = OrderedMultiset::new();
    /// assert_eq!(empty.structure().to_string(), "OrderedMultiset()");
    /// ```
    pub fn structure(&self) -> Structure<'_, T> {
        Structure {
            multiset: self,
        }
    }
}

impl<T: Ord> OrderedMultiset<T> {
    /// Adds one occurrence of `value` to the multiset.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::new();
    /// multiset.insert(2);
    /// multiset.insert(2);
    /// assert_eq!(multiset.count(&2), 2);
    /// assert_eq!(multiset.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) {
        self.raw.insert(value);
    }

    /// Removes one occurrence of `value` from the multiset. Returns whether an
    /// occurrence was present; removing an absent value leaves the multiset unchanged.
    ///
    /// The value may be any borrowed form of the multiset's value type,
    /// but the ordering on the borrowed form *must* match the
    /// ordering on the value type.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::from([2, 2]);
    /// assert_eq!(multiset.remove(&2), true);
    /// assert_eq!(multiset.remove(&2), true);
    /// assert_eq!(multiset.remove(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value)
    }

    /// Returns `true` if the multiset holds at least one occurrence of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([1, 2, 3]);
    /// assert!(multiset.contains(&1));
    /// assert!(!multiset.contains(&4));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(value)
    }

    /// Returns the multiplicity of `value`, or zero if it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([1, 2, 2]);
    /// assert_eq!(multiset.count(&2), 2);
    /// assert_eq!(multiset.count(&5), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.count(value)
    }
}

impl<T: Hash> Hash for OrderedMultiset<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for (value, count) in self.counts() {
            value.hash(state);
            count.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for OrderedMultiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.counts().eq(other.counts())
    }
}

impl<T: Eq> Eq for OrderedMultiset<T> {}

impl<T: Clone> Clone for OrderedMultiset<T> {
    fn clone(&self) -> Self {
        OrderedMultiset {
            raw: self.raw.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Structure<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multiset.is_empty() {
            f.write_str("OrderedMultiset()")
        } else {
            self.multiset.raw.fmt_structure(f)
        }
    }
}

impl<T> Default for OrderedMultiset<T> {
    fn default() -> Self {
        OrderedMultiset::new()
    }
}

impl<T: Ord> FromIterator<T> for OrderedMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut multiset = OrderedMultiset::new();
        multiset.extend(iter);
        multiset
    }
}

impl<T: Ord> Extend<T> for OrderedMultiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for OrderedMultiset<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for OrderedMultiset<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a OrderedMultiset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let (value, owed) = match self.front.take() {
            Some(front) => front,
            None => self.walk.next()?,
        };
        if owed > 1 {
            self.front = Some((value, owed - 1));
        }
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            walk: self.walk.clone(),
            front: self.front,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for UniqueIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let (value, _) = self.walk.next()?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for UniqueIter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for UniqueIter<'_, T> {}

impl<T> Clone for UniqueIter<'_, T> {
    fn clone(&self) -> Self {
        UniqueIter {
            walk: self.walk.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for UniqueIter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Counts<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<(&'a T, usize)> {
        let entry = self.walk.next()?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Counts<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Counts<'_, T> {}

impl<T> Clone for Counts<'_, T> {
    fn clone(&self) -> Self {
        Counts {
            walk: self.walk.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Counts<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.clone()).finish()
    }
}
