//! Error types for buffer operations

use thiserror::Error;

/// Error type for buffer operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("out of bounds: {len} bytes at offset {offset} exceeds {bound}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        bound: usize,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("unable to allocate {0} bytes")]
    Allocation(usize),
    #[error("malformed varint")]
    MalformedVarint,
    #[error("varint exceeds range of target type")]
    VarintRangeExceeded,
}

impl Error {
    /// Returns an [Error::OutOfBounds] for `len` bytes at `offset` against `bound`.
    pub(crate) const fn out_of_bounds(offset: usize, len: usize, bound: usize) -> Self {
        Self::OutOfBounds { offset, len, bound }
    }
}
