#![allow(non_snake_case)]

//! Sparse matrix codec.
//!
//! Two host forms are supported.  The triplet encoding is an `nnz x 3`
//! dense matrix whose columns hold the 1-based row index, the 1-based
//! column index and the value of each nonzero; it travels as an ordinary
//! dense matrix and is converted by the engine itself.  The CSC form is
//! the engine's native sparse storage and is read or written directly.

use super::CodecError;
use crate::algebra::{Complex64, CscMatrix, FloatT, IndexT};
use crate::engine::{ArrayData, EngineArray};
use num_complex::Complex;

/// Nonzeros of a sparse matrix as parallel `(rows, cols, values)` arrays
/// with 0-based indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Triplets<I, V> {
    pub rows: Vec<I>,
    pub cols: Vec<I>,
    pub values: Vec<V>,
}

impl<I, V> Triplets<I, V> {
    /// # Panics
    /// Panics if the three arrays differ in length.
    pub fn new(rows: Vec<I>, cols: Vec<I>, values: Vec<V>) -> Self {
        assert_eq!(rows.len(), cols.len());
        assert_eq!(rows.len(), values.len());
        Triplets { rows, cols, values }
    }

    /// number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn check_indices<I>(rows: &[I], cols: &[I], nnz: usize) {
    assert_eq!(rows.len(), nnz);
    assert_eq!(cols.len(), nnz);
}

/// Build the `nnz x 3` real triplet encoding of `(rows, cols, values)`.
///
/// Row and column indices are shifted by +1.  With `values == None` the
/// result is an empty `0 x 3` placeholder; converting it on the engine
/// yields a sparse matrix with no nonzeros.
///
/// # Panics
/// Panics if the arrays differ in length.
pub fn encode_triplet_real<I: IndexT, T: FloatT>(
    rows: &[I],
    cols: &[I],
    values: Option<&[T]>,
) -> EngineArray {
    let values = match values {
        Some(values) => values,
        None => return EngineArray::zeros(0, 3),
    };
    let nnz = values.len();
    check_indices(rows, cols, nnz);

    let mut cells = Vec::with_capacity(3 * nnz);
    cells.extend(rows.iter().map(|r| r.to_engine_index()));
    cells.extend(cols.iter().map(|c| c.to_engine_index()));
    cells.extend(values.iter().map(|v| v.to_cell()));
    EngineArray::from_real(nnz, 3, cells)
}

/// Build the `nnz x 3` complex triplet encoding of `(rows, cols, values)`.
///
/// The index columns are stored as complex cells with zero imaginary part.
/// With `values == None` the result is an empty complex `0 x 3` placeholder.
///
/// # Panics
/// Panics if the arrays differ in length.
pub fn encode_triplet_complex<I: IndexT, T: FloatT>(
    rows: &[I],
    cols: &[I],
    values: Option<&[Complex<T>]>,
) -> EngineArray {
    let values = match values {
        Some(values) => values,
        None => return EngineArray::complex_zeros(0, 3),
    };
    let nnz = values.len();
    check_indices(rows, cols, nnz);

    let index = |i: &I| Complex64::new(i.to_engine_index(), 0.0);
    let mut cells = Vec::with_capacity(3 * nnz);
    cells.extend(rows.iter().map(index));
    cells.extend(cols.iter().map(index));
    cells.extend(
        values
            .iter()
            .map(|v| Complex64::new(v.re.to_cell(), v.im.to_cell())),
    );
    EngineArray::from_complex(nnz, 3, cells)
}

fn triplet_width(handle: &EngineArray) -> Result<usize, CodecError> {
    if handle.n() != 3 {
        return Err(CodecError::BadTripletWidth(handle.n()));
    }
    Ok(handle.m())
}

fn unshift<I: IndexT>(cells: &[f64]) -> Result<Vec<I>, CodecError> {
    cells
        .iter()
        .map(|&v| I::from_engine_index(v).ok_or(CodecError::BadIndex(v)))
        .collect()
}

/// Decode a real `nnz x 3` triplet encoding, shifting indices by -1.
/// A complex encoding contributes the real parts of its values.
pub fn decode_triplet_real<I: IndexT, T: FloatT>(
    handle: &EngineArray,
) -> Result<Triplets<I, T>, CodecError> {
    let nnz = triplet_width(handle)?;
    let cells = handle.to_real_cells().ok_or(CodecError::NotNumeric)?;
    Ok(Triplets::new(
        unshift(&cells[..nnz])?,
        unshift(&cells[nnz..2 * nnz])?,
        cells[2 * nnz..].iter().map(|&v| T::from_cell(v)).collect(),
    ))
}

/// Decode a complex `nnz x 3` triplet encoding, shifting indices by -1.
/// A real encoding decodes with zero imaginary parts.
pub fn decode_triplet_complex<I: IndexT, T: FloatT>(
    handle: &EngineArray,
) -> Result<Triplets<I, Complex<T>>, CodecError> {
    let nnz = triplet_width(handle)?;
    let cells = handle.to_complex_cells().ok_or(CodecError::NotNumeric)?;
    let re: Vec<f64> = cells[..2 * nnz].iter().map(|z| z.re).collect();
    Ok(Triplets::new(
        unshift(&re[..nnz])?,
        unshift(&re[nnz..])?,
        cells[2 * nnz..]
            .iter()
            .map(|z| Complex::new(T::from_cell(z.re), T::from_cell(z.im)))
            .collect(),
    ))
}

/// Engine-native real sparse matrix holding a copy of `A`.
///
/// # Panics
/// Panics if `A` is not a well-formed CSC matrix.
pub fn encode_csc_real<T: FloatT>(A: &CscMatrix<T>) -> EngineArray {
    let B = CscMatrix::new(
        A.m,
        A.n,
        A.colptr.clone(),
        A.rowval.clone(),
        A.nzval.iter().map(|v| v.to_cell()).collect(),
    );
    assert!(B.check_format().is_ok());
    EngineArray::sparse_real(B)
}

/// Engine-native complex sparse matrix holding a copy of `A`.
///
/// # Panics
/// Panics if `A` is not a well-formed CSC matrix.
pub fn encode_csc_complex<T: FloatT>(A: &CscMatrix<Complex<T>>) -> EngineArray {
    let B = CscMatrix::new(
        A.m,
        A.n,
        A.colptr.clone(),
        A.rowval.clone(),
        A.nzval
            .iter()
            .map(|v| Complex64::new(v.re.to_cell(), v.im.to_cell()))
            .collect(),
    );
    assert!(B.check_format().is_ok());
    EngineArray::sparse_complex(B)
}

/// Read the engine's native CSC arrays of a sparse matrix.  A complex
/// matrix contributes the real parts of its values.
pub fn decode_csc_real<T: FloatT>(handle: &EngineArray) -> Result<CscMatrix<T>, CodecError> {
    let (colptr, rowval, nzval) = match handle.data() {
        ArrayData::SparseReal(A) => (
            A.colptr.clone(),
            A.rowval.clone(),
            A.nzval.iter().map(|&v| T::from_cell(v)).collect(),
        ),
        ArrayData::SparseComplex(A) => (
            A.colptr.clone(),
            A.rowval.clone(),
            A.nzval.iter().map(|z| T::from_cell(z.re)).collect(),
        ),
        _ => return Err(CodecError::NotSparse),
    };
    Ok(CscMatrix {
        m: handle.m(),
        n: handle.n(),
        colptr,
        rowval,
        nzval,
    })
}

/// Read the engine's native CSC arrays of a sparse matrix as complex
/// values.  A real matrix decodes with zero imaginary parts.
pub fn decode_csc_complex<T: FloatT>(
    handle: &EngineArray,
) -> Result<CscMatrix<Complex<T>>, CodecError> {
    let (colptr, rowval, nzval) = match handle.data() {
        ArrayData::SparseReal(A) => (
            A.colptr.clone(),
            A.rowval.clone(),
            A.nzval
                .iter()
                .map(|&v| Complex::new(T::from_cell(v), T::zero()))
                .collect(),
        ),
        ArrayData::SparseComplex(A) => (
            A.colptr.clone(),
            A.rowval.clone(),
            A.nzval
                .iter()
                .map(|z| Complex::new(T::from_cell(z.re), T::from_cell(z.im)))
                .collect(),
        ),
        _ => return Err(CodecError::NotSparse),
    };
    Ok(CscMatrix {
        m: handle.m(),
        n: handle.n(),
        colptr,
        rowval,
        nzval,
    })
}
