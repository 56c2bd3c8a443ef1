mod arena;
mod node;
mod raw_ordered_multiset;

pub(crate) use raw_ordered_multiset::{RawOrderedMultiset, Walk};
