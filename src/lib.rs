//! A height-balanced order-statistic multiset for Rust.
//!
//! [`OrderedMultiset`] is an AVL tree in which every node holds one distinct key
//! together with the number of times it was inserted. Each node also caches the
//! number of occurrences stored in its left and right subtrees, which gives
//! O(log n) order-statistic queries alongside the usual lookups:
//!
//! - [`at`](OrderedMultiset::at) - The occurrence at a sorted position, negative positions count from the end
//! - [`rank_less_than`](OrderedMultiset::rank_less_than) - How many occurrences sort strictly before a key
//! - [`count`](OrderedMultiset::count) - The multiplicity of a key
//! - Indexing by [`Rank`] - e.g., `multiset[Rank(0)]` for the smallest occurrence
//!
//! # Example
//!
//! ```
//! use avl_multiset::OrderedMultiset;
//!
//! let mut scores = OrderedMultiset::new();
//! for score in [10, 20, 20, 30, 40, 50, 25, 20] {
//!     scores.insert(score);
//! }
//!
//! assert_eq!(scores.len(), 8);
//! assert_eq!(scores.count(&20), 3);
//! assert_eq!(scores.at(0), Ok(&10));
//! assert_eq!(scores.at(-1), Ok(&50));
//! assert_eq!(scores.rank_less_than(&25), 4);
//!
//! // Removing drops a single occurrence.
//! scores.remove(&20);
//! assert_eq!(scores.count(&20), 2);
//!
//! let distinct: Vec<_> = scores.iter_unique().copied().collect();
//! assert_eq!(distinct, [10, 20, 25, 30, 40, 50]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) everywhere** - Insert, remove, lookup, rank and select all follow one root-to-leaf path
//! - **Duplicates are free** - Re-inserting a key bumps a counter instead of growing the tree
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to their children by index. Insertion and removal
//! recurse down a single path and rebuild it on the way back up, refreshing each node's
//! height and subtree lengths and applying at most one single or double rotation per
//! level. Rotation events are reported through [`tracing`] at the `TRACE` level.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;

pub mod ordered_multiset;

pub use error::Error;
pub use order_statistic::Rank;
pub use ordered_multiset::OrderedMultiset;
