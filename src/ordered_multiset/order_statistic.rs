use core::borrow::Borrow;
use core::ops::Index;

use super::OrderedMultiset;
use crate::{Error, Rank};

impl<T: Ord> OrderedMultiset<T> {
    /// Returns the occurrence at position `index` in sorted order, with duplicates
    /// counted individually.
    ///
    /// Negative indices count back from the end, so `-1` is the largest value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] unless `-len <= index < len`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::{Error, OrderedMultiset};
    ///
    /// let multiset = OrderedMultiset::from([10, 20, 20, 30]);
    /// assert_eq!(multiset.at(1), Ok(&20));
    /// assert_eq!(multiset.at(-1), Ok(&30));
    /// assert_eq!(multiset.at(-4), Ok(&10));
    /// assert_eq!(multiset.at(4), Err(Error::IndexOutOfRange { index: 4, len: 4 }));
    /// ```
    pub fn at(&self, index: isize) -> Result<&T, Error> {
        let len = self.len();
        let position = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            Some(index.unsigned_abs())
        };

        position.and_then(|position| self.raw.select(position)).ok_or(Error::IndexOutOfRange {
            index,
            len,
        })
    }

    /// Returns the occurrence at zero-based position `rank` in sorted order, or
    /// `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([10, 20, 20]);
    /// assert_eq!(multiset.get_by_rank(2), Some(&20));
    /// assert!(multiset.get_by_rank(3).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&T> {
        self.raw.select(rank)
    }

    /// Returns the number of occurrences strictly less than `value`.
    ///
    /// `value` does not need to be present. For any occurrence `v` at position `i`,
    /// `rank_less_than(v) <= i < rank_less_than(v) + count(v)`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_multiset::OrderedMultiset;
    ///
    /// let multiset = OrderedMultiset::from([10, 20, 20, 20, 25, 30]);
    /// assert_eq!(multiset.rank_less_than(&25), 4);
    /// assert_eq!(multiset.rank_less_than(&20), 1);
    /// assert_eq!(multiset.rank_less_than(&5), 0);
    /// assert_eq!(multiset.rank_less_than(&99), 6);
    /// ```
    #[must_use]
    pub fn rank_less_than<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank_less_than(value)
    }
}

/// Indexes into the multiset by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use avl_multiset::{OrderedMultiset, Rank};
///
/// let multiset = OrderedMultiset::from([10, 20, 20]);
/// assert_eq!(multiset[Rank(1)], 20);
/// ```
impl<T: Ord> Index<Rank> for OrderedMultiset<T> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).expect("index out of bounds")
    }
}
