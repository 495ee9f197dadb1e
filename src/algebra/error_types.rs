use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
/// Error type returned by sparse matrix assembly operations.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    #[error("Row value exceeds the matrix row dimension")]
    /// Row value exceeds the matrix row dimension
    BadRowval,
    #[error("Bad column pointer values")]
    /// Matrix column pointer values are defective
    BadColptr,
    /// A triplet index lies outside the requested matrix dimensions
    #[error("Triplet index ({row}, {col}) lies outside a {m}x{n} matrix")]
    BadIndex {
        row: usize,
        col: usize,
        m: usize,
        n: usize,
    },
}
