use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::fmt;

use smallvec::SmallVec;
use tracing::trace;

use super::arena::{Arena, Handle};
use super::node::Node;

/// Inline capacity of the in-order walker's stack. An AVL tree over `u32::MAX`
/// nodes is at most 46 levels deep, so the walker never spills to the heap.
const WALK_DEPTH: usize = 64;

/// The AVL engine backing `OrderedMultiset`.
///
/// Mutations are written as recursive functions that take a subtree root and
/// hand back the (possibly different) root of the rebuilt subtree; the caller
/// relinks it. Rotations only touch the two nodes they swap.
#[derive(Clone)]
pub(crate) struct RawOrderedMultiset<T> {
    nodes: Arena<Node<T>>,
    root: Option<Handle>,
}

impl<T> RawOrderedMultiset<T> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Total number of occurrences, duplicates included.
    pub(crate) fn len(&self) -> usize {
        self.subtree_len(self.root)
    }

    /// Number of distinct keys.
    pub(crate) const fn distinct_len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Capacity in distinct keys.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        trace!(distinct = self.nodes.len(), "clearing multiset");
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.nodes.get_mut(handle)
    }

    fn height(&self, subtree: Option<Handle>) -> u8 {
        subtree.map_or(0, |handle| self.node(handle).height())
    }

    fn subtree_len(&self, subtree: Option<Handle>) -> usize {
        subtree.map_or(0, |handle| self.node(handle).len())
    }

    fn balance_factor(&self, handle: Handle) -> i16 {
        let node = self.node(handle);
        i16::from(self.height(node.left())) - i16::from(self.height(node.right()))
    }

    /// Recomputes `handle`'s cached aggregates from its current children.
    fn update(&mut self, handle: Handle) {
        let node = self.node(handle);
        let (left, right) = (node.left(), node.right());
        let left = (self.height(left), self.subtree_len(left));
        let right = (self.height(right), self.subtree_len(right));
        self.node_mut(handle).refresh(left, right);
    }

    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let Some(pivot) = self.node(handle).right() else {
            panic!("`RawOrderedMultiset::rotate_left()` - node has no right child!");
        };
        let inner = self.node(pivot).left();

        self.node_mut(pivot).set_left(Some(handle));
        self.node_mut(handle).set_right(inner);

        // The old root is now the pivot's child, so it must be refreshed first.
        self.update(handle);
        self.update(pivot);
        trace!(height = self.node(pivot).height(), "rotated left");
        pivot
    }

    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let Some(pivot) = self.node(handle).left() else {
            panic!("`RawOrderedMultiset::rotate_right()` - node has no left child!");
        };
        let inner = self.node(pivot).right();

        self.node_mut(pivot).set_right(Some(handle));
        self.node_mut(handle).set_left(inner);

        self.update(handle);
        self.update(pivot);
        trace!(height = self.node(pivot).height(), "rotated right");
        pivot
    }

    /// Refreshes `handle` and applies at most one single or double rotation.
    /// Returns the root of the rebalanced subtree.
    fn update_and_balance(&mut self, handle: Handle) -> Handle {
        self.update(handle);
        let balance = self.balance_factor(handle);

        if balance > 1 {
            if let Some(left) = self.node(handle).left()
                && self.balance_factor(left) < 0
            {
                let left = self.rotate_left(left);
                self.node_mut(handle).set_left(Some(left));
            }
            self.rotate_right(handle)
        } else if balance < -1 {
            if let Some(right) = self.node(handle).right()
                && self.balance_factor(right) > 0
            {
                let right = self.rotate_right(right);
                self.node_mut(handle).set_right(Some(right));
            }
            self.rotate_left(handle)
        } else {
            handle
        }
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.node(handle).left() {
            handle = left;
        }
        handle
    }

    fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.node(handle).right() {
            handle = right;
        }
        handle
    }

    pub(crate) fn first(&self) -> Option<&T> {
        self.root.map(|root| self.node(self.leftmost(root)).key())
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.root.map(|root| self.node(self.rightmost(root)).key())
    }

    /// Returns the key at zero-based position `index`, duplicates counted individually.
    pub(crate) fn select(&self, mut index: usize) -> Option<&T> {
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.node(handle);
            if index < node.left_len() {
                current = node.left();
            } else if index < node.left_len() + node.count() {
                return Some(node.key());
            } else {
                index -= node.left_len() + node.count();
                current = node.right();
            }
        }

        None
    }

    /// Walks the distinct keys in ascending order together with their multiplicities.
    pub(crate) fn walk(&self) -> Walk<'_, T> {
        let mut walk = Walk {
            nodes: &self.nodes,
            stack: SmallVec::new(),
        };
        walk.descend(self.root);
        walk
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, subtree: Option<Handle>, depth: usize) -> fmt::Result
    where
        T: fmt::Display,
    {
        let Some(handle) = subtree else {
            return Ok(());
        };
        let node = self.node(handle);

        self.fmt_subtree(f, node.left(), depth + 1)?;
        for _ in 0..depth {
            f.write_str("  ")?;
        }
        writeln!(f, "{}: {} < {} > {}", node.key(), node.left_len(), node.count(), node.right_len())?;
        self.fmt_subtree(f, node.right(), depth + 1)
    }

    /// Writes one line per node, in order, indented by depth.
    pub(crate) fn fmt_structure(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        T: fmt::Display,
    {
        self.fmt_subtree(f, self.root, 0)
    }
}

impl<T: Ord> RawOrderedMultiset<T> {
    fn search<Q>(&self, key: &Q) -> Option<&Node<T>>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.node(handle);
            current = match key.cmp(node.key().borrow()) {
                Less => node.left(),
                Greater => node.right(),
                Equal => return Some(node),
            };
        }

        None
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    pub(crate) fn count<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map_or(0, Node::count)
    }

    /// Counts the occurrences strictly less than `key`.
    pub(crate) fn rank_less_than<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut rank = 0;

        while let Some(handle) = current {
            let node = self.node(handle);
            if key.cmp(node.key().borrow()) == Greater {
                rank += node.left_len() + node.count();
                current = node.right();
            } else {
                current = node.left();
            }
        }

        rank
    }

    pub(crate) fn insert(&mut self, key: T) {
        self.root = Some(self.insert_into(self.root, key));
    }

    fn insert_into(&mut self, subtree: Option<Handle>, key: T) -> Handle {
        let Some(handle) = subtree else {
            let handle = self.nodes.alloc(Node::new(key));
            trace!(distinct = self.nodes.len(), "created node");
            return handle;
        };

        let node = self.node_mut(handle);
        match key.cmp(node.key()) {
            Equal => {
                // Same shape, so this node needs no rebalancing. Ancestors refresh
                // their lengths as the recursion unwinds.
                node.increment();
                return handle;
            }
            Less => {
                let left = node.left();
                let left = self.insert_into(left, key);
                self.node_mut(handle).set_left(Some(left));
            }
            Greater => {
                let right = node.right();
                let right = self.insert_into(right, key);
                self.node_mut(handle).set_right(Some(right));
            }
        }

        self.update_and_balance(handle)
    }

    /// Removes one occurrence of `key`. Returns `false` if `key` was absent.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let before = self.len();
        self.root = self.remove_from(self.root, key);
        self.len() < before
    }

    fn remove_from<Q>(&mut self, subtree: Option<Handle>, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = subtree?;
        let node = self.node_mut(handle);

        match key.cmp(node.key().borrow()) {
            Less => {
                let left = node.left();
                let left = self.remove_from(left, key);
                self.node_mut(handle).set_left(left);
            }
            Greater => {
                let right = node.right();
                let right = self.remove_from(right, key);
                self.node_mut(handle).set_right(right);
            }
            Equal => {
                if node.decrement() {
                    return Some(handle);
                }

                match (node.left(), node.right()) {
                    (None, child) | (child, None) => {
                        self.nodes.free(handle);
                        trace!(distinct = self.nodes.len(), "spliced out node");
                        return child;
                    }
                    (Some(_), Some(right)) => {
                        // Pull the in-order successor's key and multiplicity up into this
                        // node. The successor keeps the removed key with a multiplicity of
                        // one; it is the smallest key of `right`, so removing `key` from
                        // `right` lands on it and unlinks it.
                        let successor = self.leftmost(right);
                        let (node, successor) = self.nodes.get_pair_mut(handle, successor);
                        node.absorb(successor);

                        let right = self.remove_from(Some(right), key);
                        self.node_mut(handle).set_right(right);
                    }
                }
            }
        }

        Some(self.update_and_balance(handle))
    }
}

/// In-order walk over `(key, multiplicity)` pairs.
pub(crate) struct Walk<'a, T> {
    nodes: &'a Arena<Node<T>>,
    stack: SmallVec<[Handle; WALK_DEPTH]>,
}

impl<T> Clone for Walk<'_, T> {
    fn clone(&self) -> Self {
        Walk {
            nodes: self.nodes,
            stack: self.stack.clone(),
        }
    }
}

impl<T> Walk<'_, T> {
    fn descend(&mut self, mut subtree: Option<Handle>) {
        while let Some(handle) = subtree {
            self.stack.push(handle);
            subtree = self.nodes.get(handle).left();
        }
    }
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.stack.pop()?;
        let nodes = self.nodes;
        let node = nodes.get(handle);
        self.descend(node.right());
        Some((node.key(), node.count()))
    }
}
