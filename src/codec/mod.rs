//! Conversion between host matrix buffers and engine values.
//!
//! The dense codec handles real, index and complex buffers in either
//! [`Layout`](crate::algebra::Layout).  The sparse codec handles the
//! triplet encoding and the engine's native CSC form.

use thiserror::Error;

mod buffer;
mod dense;
mod sparse;

pub use buffer::*;
pub use dense::*;
pub use sparse::*;

/// Error type returned by the codecs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("dimension mismatch: expected {expected:?}, engine value is {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("engine value is not numeric")]
    NotNumeric,
    #[error("engine value is not stored in sparse form")]
    NotSparse,
    #[error("triplet encoding must have 3 columns, found {0}")]
    BadTripletWidth(usize),
    #[error("engine cell {0} is not a valid 1-based index")]
    BadIndex(f64),
}
