use thiserror::Error;

/// Errors returned by fallible [`OrderedMultiset`](crate::OrderedMultiset) queries.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// A positional lookup fell outside `-len..len`.
    #[error("index {index} out of range for multiset of length {len}")]
    IndexOutOfRange {
        /// The index as passed by the caller, before negative indices were resolved.
        index: isize,
        /// The length of the multiset at the time of the call.
        len: usize,
    },
}
