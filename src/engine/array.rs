#![allow(non_snake_case)]

use crate::algebra::{Complex64, CscMatrix};

/// Storage of an [`EngineArray`].
///
/// Dense data is column-major.  Sparse data uses the engine's native CSC
/// form with 0-based row indices.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
    SparseReal(CscMatrix<f64>),
    SparseComplex(CscMatrix<Complex64>),
    /// character matrix, one string per row
    Char(Vec<String>),
}

/// Storage form of an engine matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageForm {
    Dense,
    Sparse,
}

/// An engine-native matrix value.
///
/// Values are handed to the engine with
/// [`put_variable`](crate::engine::Engine::put_variable) and received from it
/// with [`get_variable`](crate::engine::Engine::get_variable).  An array is
/// owned by whoever holds it: a received array is a copy that is released
/// when dropped, and the engine keeps its own value until the variable is
/// cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineArray {
    m: usize,
    n: usize,
    data: ArrayData,
}

impl EngineArray {
    /// `m x n` real dense matrix of zeros
    pub fn zeros(m: usize, n: usize) -> Self {
        Self::from_real(m, n, vec![0.0; m * n])
    }

    /// `m x n` complex dense matrix of zeros
    pub fn complex_zeros(m: usize, n: usize) -> Self {
        Self::from_complex(m, n, vec![Complex64::new(0.0, 0.0); m * n])
    }

    /// Real dense matrix from column-major cells.
    ///
    /// # Panics
    /// Panics if `cells` does not hold `m*n` values.
    pub fn from_real(m: usize, n: usize, cells: Vec<f64>) -> Self {
        assert_eq!(cells.len(), m * n);
        EngineArray {
            m,
            n,
            data: ArrayData::Real(cells),
        }
    }

    /// Complex dense matrix from column-major cells.
    ///
    /// # Panics
    /// Panics if `cells` does not hold `m*n` values.
    pub fn from_complex(m: usize, n: usize, cells: Vec<Complex64>) -> Self {
        assert_eq!(cells.len(), m * n);
        EngineArray {
            m,
            n,
            data: ArrayData::Complex(cells),
        }
    }

    /// 1 x 1 real matrix
    pub fn scalar(v: f64) -> Self {
        Self::from_real(1, 1, vec![v])
    }

    pub fn sparse_real(A: CscMatrix<f64>) -> Self {
        EngineArray {
            m: A.m,
            n: A.n,
            data: ArrayData::SparseReal(A),
        }
    }

    pub fn sparse_complex(A: CscMatrix<Complex64>) -> Self {
        EngineArray {
            m: A.m,
            n: A.n,
            data: ArrayData::SparseComplex(A),
        }
    }

    /// Character matrix with one row per string.  Shorter rows are padded
    /// with blanks to the longest row.
    pub fn from_strings<S: AsRef<str>>(rows: &[S]) -> Self {
        let n = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let rows: Vec<String> = rows
            .iter()
            .map(|r| format!("{:<width$}", r.as_ref(), width = n))
            .collect();
        EngineArray {
            m: rows.len(),
            n,
            data: ArrayData::Char(rows),
        }
    }

    /// number of rows
    pub fn m(&self) -> usize {
        self.m
    }

    /// number of columns
    pub fn n(&self) -> usize {
        self.n
    }

    /// dimensions `(m, n)`
    pub fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    pub fn numel(&self) -> usize {
        self.m * self.n
    }

    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn into_data(self) -> ArrayData {
        self.data
    }

    pub fn storage(&self) -> StorageForm {
        match self.data {
            ArrayData::SparseReal(_) | ArrayData::SparseComplex(_) => StorageForm::Sparse,
            _ => StorageForm::Dense,
        }
    }

    pub fn is_sparse(&self) -> bool {
        self.storage() == StorageForm::Sparse
    }

    pub fn is_complex(&self) -> bool {
        matches!(
            self.data,
            ArrayData::Complex(_) | ArrayData::SparseComplex(_)
        )
    }

    pub fn is_char(&self) -> bool {
        matches!(self.data, ArrayData::Char(_))
    }

    /// Real dense cells, if this is a real dense matrix.
    pub fn real_cells(&self) -> Option<&[f64]> {
        match &self.data {
            ArrayData::Real(v) => Some(v),
            _ => None,
        }
    }

    /// Complex dense cells, if this is a complex dense matrix.
    pub fn complex_cells(&self) -> Option<&[Complex64]> {
        match &self.data {
            ArrayData::Complex(v) => Some(v),
            _ => None,
        }
    }

    /// Text of a character matrix, rows joined by newlines.
    pub fn as_text(&self) -> Option<String> {
        match &self.data {
            ArrayData::Char(rows) => Some(rows.join("\n")),
            _ => None,
        }
    }

    /// Number of stored entries of a sparse matrix.
    pub fn nzmax(&self) -> Option<usize> {
        match &self.data {
            ArrayData::SparseReal(A) => Some(A.nnz()),
            ArrayData::SparseComplex(A) => Some(A.nnz()),
            _ => None,
        }
    }

    /// Column-major dense copy of any numeric array, with complex cells.
    /// Sparse arrays are expanded.  Character arrays yield `None`.
    pub fn to_complex_cells(&self) -> Option<Vec<Complex64>> {
        match &self.data {
            ArrayData::Real(v) => Some(v.iter().map(|&x| Complex64::new(x, 0.0)).collect()),
            ArrayData::Complex(v) => Some(v.clone()),
            ArrayData::SparseReal(A) => Some(
                A.to_dense()
                    .into_iter()
                    .map(|x| Complex64::new(x, 0.0))
                    .collect(),
            ),
            ArrayData::SparseComplex(A) => Some(A.to_dense()),
            ArrayData::Char(_) => None,
        }
    }

    /// Column-major dense copy of the real parts of any numeric array.
    /// Sparse arrays are expanded.  Character arrays yield `None`.
    pub fn to_real_cells(&self) -> Option<Vec<f64>> {
        match &self.data {
            ArrayData::Real(v) => Some(v.clone()),
            ArrayData::Complex(v) => Some(v.iter().map(|z| z.re).collect()),
            ArrayData::SparseReal(A) => Some(A.to_dense()),
            ArrayData::SparseComplex(A) => Some(A.to_dense().iter().map(|z| z.re).collect()),
            ArrayData::Char(_) => None,
        }
    }
}
