//---------------------------------------------------------
// conversion between coordinate (triplet) form and CSC.
//---------------------------------------------------------

use crate::algebra::{CscMatrix, Scalar, SparseFormatError};
use std::iter::zip;

impl<T> CscMatrix<T>
where
    T: Scalar,
{
    /// Assemble an `m x n` matrix from 0-based `(row, col, value)` triplets.
    ///
    /// Follows the engine's sparse construction rules: entries sharing a
    /// position are summed and entries that end up exactly zero are dropped.
    pub fn new_from_triplets(
        m: usize,
        n: usize,
        I: &[usize],
        J: &[usize],
        V: &[T],
    ) -> Result<Self, SparseFormatError> {
        if I.len() != J.len() || I.len() != V.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if let Some((&row, &col)) = zip(I, J).find(|&(&r, &c)| r >= m || c >= n) {
            return Err(SparseFormatError::BadIndex { row, col, m, n });
        }

        // bucket the entries by column
        let mut bucketptr = vec![0; n + 1];
        for &c in J {
            bucketptr[c + 1] += 1;
        }
        for col in 0..n {
            bucketptr[col + 1] += bucketptr[col];
        }
        let mut order = vec![0; I.len()];
        let mut next = bucketptr.clone();
        for (k, &c) in J.iter().enumerate() {
            order[next[c]] = k;
            next[c] += 1;
        }

        // sort each column by row and merge duplicates
        let mut colptr = vec![0; n + 1];
        let mut rowval: Vec<usize> = Vec::with_capacity(I.len());
        let mut nzval: Vec<T> = Vec::with_capacity(I.len());
        for col in 0..n {
            let entries = &mut order[bucketptr[col]..bucketptr[col + 1]];
            entries.sort_by_key(|&k| I[k]);
            let first = rowval.len();
            for &k in entries.iter() {
                let duplicate = rowval.len() > first && rowval[rowval.len() - 1] == I[k];
                if duplicate {
                    if let Some(v) = nzval.last_mut() {
                        *v += V[k];
                    }
                } else {
                    rowval.push(I[k]);
                    nzval.push(V[k]);
                }
            }
            colptr[col + 1] = rowval.len();
        }

        let mut A = CscMatrix::new(m, n, colptr, rowval, nzval);
        A.dropzeros();
        Ok(A)
    }

    /// The nonzero entries as 0-based `(rows, cols, values)` triplets, in
    /// column-major order.  Explicitly stored zeros are skipped.
    pub fn findnz(&self) -> (Vec<usize>, Vec<usize>, Vec<T>) {
        let mut rows = Vec::with_capacity(self.nnz());
        let mut cols = Vec::with_capacity(self.nnz());
        let mut vals = Vec::with_capacity(self.nnz());
        for col in 0..self.n {
            for ptr in self.colptr[col]..self.colptr[col + 1] {
                if self.nzval[ptr] != T::zero() {
                    rows.push(self.rowval[ptr]);
                    cols.push(col);
                    vals.push(self.nzval[ptr]);
                }
            }
        }
        (rows, cols, vals)
    }
}
