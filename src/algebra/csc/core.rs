#![allow(non_snake_case)]

use crate::algebra::{Scalar, SparseFormatError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// This is the host-side image of an engine sparse matrix: the same three
/// parallel arrays the engine keeps internally, with 0-based row indices.
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use engine_bridge::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
///
/// ```
///

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer.
    ///
    /// Ths field should have length `n+1`. The last entry corresponds
    /// to the the number of nonzeros and should agree with the lengths
    /// of the `rowval` and `nzval` fields.
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: Scalar,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.   This constructor does __not__
    /// ensure that rows indices are all in bounds or that data is arranged
    /// such that entries within each column appear in order of increasing
    /// row index.   Responsibility for ensuring these conditions hold
    /// is left to the caller.
    ///
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// allocate space for a sparse matrix with `nnz` elements
    ///
    /// To make an m x n matrix of zeros, use
    /// ```no_run
    /// use engine_bridge::algebra::CscMatrix;
    /// let m = 3;
    /// let n = 4;
    /// let A : CscMatrix<f64> = CscMatrix::spalloc(m,n,0);
    /// ```

    pub fn spalloc(m: usize, n: usize, nnz: usize) -> Self {
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// matrix dimensions `(m, n)`
    pub fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for colptr monotonicity
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        //check for rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowval);
            }
        }
        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        Ok(())
    }

    /// Value at `(row, col)`, zero if there is no structural entry.
    ///
    /// # Panics
    /// Panics if the indices are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.m && col < self.n);
        let rng = self.colptr[col]..self.colptr[col + 1];
        match self.rowval[rng.clone()].binary_search(&row) {
            Ok(k) => self.nzval[rng.start + k],
            Err(_) => T::zero(),
        }
    }

    /// Dense copy of the matrix in column-major order.
    pub fn to_dense(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.m * self.n];
        for col in 0..self.n {
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                out[col * self.m + self.rowval[ptr]] = self.nzval[ptr];
            }
        }
        out
    }

    /// Build from a dense column-major buffer, keeping only nonzero entries.
    ///
    /// # Panics
    /// Panics if `values` does not hold exactly `m*n` entries.
    pub fn from_dense(m: usize, n: usize, values: &[T]) -> Self {
        assert_eq!(values.len(), m * n);
        let mut colptr = vec![0; n + 1];
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        for col in 0..n {
            for (row, &v) in values[col * m..(col + 1) * m].iter().enumerate() {
                if v != T::zero() {
                    rowval.push(row);
                    nzval.push(v);
                }
            }
            colptr[col + 1] = rowval.len();
        }
        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Remove structural entries holding an explicit zero.
    pub fn dropzeros(&mut self) {
        let mut dest = 0;
        let mut start = 0;
        for col in 0..self.n {
            let stop = self.colptr[col + 1];
            for ptr in start..stop {
                if self.nzval[ptr] != T::zero() {
                    self.rowval[dest] = self.rowval[ptr];
                    self.nzval[dest] = self.nzval[ptr];
                    dest += 1;
                }
            }
            start = stop;
            self.colptr[col + 1] = dest;
        }
        self.rowval.truncate(dest);
        self.nzval.truncate(dest);
    }

    /// Convert every stored value with `f`, keeping the sparsity pattern.
    pub fn map_values<U: Scalar>(&self, f: impl Fn(T) -> U) -> CscMatrix<U> {
        CscMatrix::new(
            self.m,
            self.n,
            self.colptr.clone(),
            self.rowval.clone(),
            self.nzval.iter().map(|&v| f(v)).collect(),
        )
    }
}
