use core::mem;
use core::num::NonZero;

use super::arena::Handle;

/// An AVL node holding every occurrence of one key.
#[derive(Clone)]
pub(crate) struct Node<T> {
    key: T,
    // Number of occurrences of `key`; the node is unlinked instead of reaching zero.
    count: NonZero<usize>,
    // 1 + max(child heights). An absent subtree has height 0.
    height: u8,
    left: Option<Handle>,
    right: Option<Handle>,
    // Sum of multiplicities in each child subtree.
    left_len: usize,
    right_len: usize,
}

impl<T> Node<T> {
    /// Creates a leaf holding a single occurrence of `key`.
    pub(crate) const fn new(key: T) -> Self {
        Self {
            key,
            count: NonZero::<usize>::MIN,
            height: 1,
            left: None,
            right: None,
            left_len: 0,
            right_len: 0,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &T {
        &self.key
    }

    #[inline]
    pub(crate) const fn count(&self) -> usize {
        self.count.get()
    }

    #[inline]
    pub(crate) const fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn left_len(&self) -> usize {
        self.left_len
    }

    #[inline]
    pub(crate) const fn right_len(&self) -> usize {
        self.right_len
    }

    /// Total occurrences stored in the subtree rooted here.
    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.left_len + self.count.get() + self.right_len
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    pub(crate) fn increment(&mut self) {
        self.count = self.count.checked_add(1).unwrap_or_else(|| panic!("`Node::increment()` - multiplicity overflow!"));
    }

    /// Drops one occurrence. Returns `false` when only one occurrence is left,
    /// in which case the caller must unlink the node instead.
    pub(crate) fn decrement(&mut self) -> bool {
        match NonZero::new(self.count.get() - 1) {
            Some(count) => {
                self.count = count;
                true
            }
            None => false,
        }
    }

    /// Moves `other`'s key and multiplicity into `self`. `other` is left holding
    /// `self`'s old key with a multiplicity of one, ready to be unlinked.
    pub(crate) fn absorb(&mut self, other: &mut Self) {
        mem::swap(&mut self.key, &mut other.key);
        self.count = other.count;
        other.count = NonZero::<usize>::MIN;
    }

    /// Recomputes the cached height and child lengths from the children's
    /// `(height, len)` measurements.
    pub(crate) fn refresh(&mut self, left: (u8, usize), right: (u8, usize)) {
        self.height = 1 + left.0.max(right.0);
        self.left_len = left.1;
        self.right_len = right.1;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_a_single_leaf() {
        let node = Node::new('k');
        assert_eq!(*node.key(), 'k');
        assert_eq!(node.count(), 1);
        assert_eq!(node.height(), 1);
        assert_eq!(node.len(), 1);
        assert!(node.left().is_none() && node.right().is_none());
    }

    #[test]
    fn decrement_stops_at_one() {
        let mut node = Node::new(7);
        node.increment();
        node.increment();
        assert_eq!(node.count(), 3);

        assert!(node.decrement());
        assert!(node.decrement());
        assert!(!node.decrement());
        assert_eq!(node.count(), 1);
    }

    #[test]
    fn absorb_takes_key_and_resets_donor() {
        let mut target = Node::new(10);
        let mut donor = Node::new(20);
        donor.increment();
        donor.increment();

        target.absorb(&mut donor);

        assert_eq!((*target.key(), target.count()), (20, 3));
        assert_eq!((*donor.key(), donor.count()), (10, 1));
    }

    #[test]
    fn refresh_uses_taller_child() {
        let mut node = Node::new(0);
        node.refresh((3, 5), (1, 1));
        assert_eq!(node.height(), 4);
        assert_eq!(node.len(), 7);
        assert_eq!((node.left_len(), node.right_len()), (5, 1));
    }
}
