/// A zero-based rank into the sorted order of a multiset, duplicates counted
/// individually.
///
/// # Examples
///
/// ```
/// use avl_multiset::{OrderedMultiset, Rank};
///
/// let multiset = OrderedMultiset::from([20, 10, 20]);
///
/// assert_eq!(multiset[Rank(0)], 10);
/// assert_eq!(multiset[Rank(2)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
