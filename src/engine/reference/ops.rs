#![allow(non_snake_case)]

use super::lu::lu_solve;
use super::parser::BinOp;
use super::EvalError;
use crate::algebra::{Complex64, CscMatrix, Scalar};
use crate::engine::{ArrayData, EngineArray};

/// Column-major dense working copy of an engine value.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Dense<T> {
    pub m: usize,
    pub n: usize,
    pub cells: Vec<T>,
}

impl<T: Scalar> Dense<T> {
    pub fn new(m: usize, n: usize, cells: Vec<T>) -> Self {
        debug_assert_eq!(cells.len(), m * n);
        Dense { m, n, cells }
    }

    pub fn zeros(m: usize, n: usize) -> Self {
        Self::new(m, n, vec![T::zero(); m * n])
    }

    pub fn is_scalar(&self) -> bool {
        self.m == 1 && self.n == 1
    }

    pub fn map(self, f: impl Fn(T) -> T) -> Self {
        Dense {
            m: self.m,
            n: self.n,
            cells: self.cells.into_iter().map(f).collect(),
        }
    }

    // elementwise with scalar expansion on either side
    fn zip_with(self, other: Self, f: impl Fn(T, T) -> T) -> Result<Self, EvalError> {
        if self.is_scalar() {
            let s = self.cells[0];
            Ok(other.map(|x| f(s, x)))
        } else if other.is_scalar() {
            let s = other.cells[0];
            Ok(self.map(|x| f(x, s)))
        } else if (self.m, self.n) == (other.m, other.n) {
            let cells = self
                .cells
                .into_iter()
                .zip(other.cells)
                .map(|(a, b)| f(a, b))
                .collect();
            Ok(Dense::new(self.m, self.n, cells))
        } else {
            Err(EvalError::Dimensions)
        }
    }

    pub fn apply(self, op: BinOp, other: Self) -> Result<Self, EvalError> {
        match op {
            BinOp::Add => self.zip_with(other, |a, b| a + b),
            BinOp::Sub => self.zip_with(other, |a, b| a - b),
            BinOp::Mul => self.matmul(other),
            BinOp::LeftDiv => self.left_divide(other),
        }
    }

    fn matmul(self, other: Self) -> Result<Self, EvalError> {
        if self.is_scalar() || other.is_scalar() {
            return self.zip_with(other, |a, b| a * b);
        }
        if self.n != other.m {
            return Err(EvalError::InnerDimensions);
        }
        let (m, k, n) = (self.m, self.n, other.n);
        let mut out = vec![T::zero(); m * n];
        for j in 0..n {
            for p in 0..k {
                let b = other.cells[j * k + p];
                if b == T::zero() {
                    continue;
                }
                for i in 0..m {
                    out[j * m + i] += self.cells[p * m + i] * b;
                }
            }
        }
        Ok(Dense::new(m, n, out))
    }

    fn left_divide(self, other: Self) -> Result<Self, EvalError> {
        if self.is_scalar() {
            let s = self.cells[0];
            if s == T::zero() {
                return Err(EvalError::Singular);
            }
            return Ok(other.map(|x| x / s));
        }
        if self.m != other.m {
            return Err(EvalError::Dimensions);
        }
        if self.m != self.n {
            return Err(EvalError::Message(
                "Left division is only supported for square matrices.".into(),
            ));
        }
        let cells = lu_solve(self.n, self.cells, other.cells, other.n)?;
        Ok(Dense::new(self.n, other.n, cells))
    }

    /// Submatrix at the given row and column positions.
    pub fn gather(&self, rows: &[usize], cols: &[usize]) -> Self {
        let mut cells = Vec::with_capacity(rows.len() * cols.len());
        for &c in cols {
            for &r in rows {
                cells.push(self.cells[c * self.m + r]);
            }
        }
        Dense::new(rows.len(), cols.len(), cells)
    }

    /// Write `value` at the given positions, growing the matrix with
    /// zeros as needed.  A scalar `value` is expanded.
    pub fn scatter(
        self,
        rows: &[usize],
        cols: &[usize],
        value: &Self,
    ) -> Result<Self, EvalError> {
        let count = rows.len() * cols.len();
        if !value.is_scalar() && value.cells.len() != count {
            return Err(EvalError::Message(
                "Subscripted assignment dimension mismatch.".into(),
            ));
        }
        let m = rows.iter().map(|r| r + 1).max().unwrap_or(0).max(self.m);
        let n = cols.iter().map(|c| c + 1).max().unwrap_or(0).max(self.n);

        let mut out = if (m, n) == (self.m, self.n) {
            self
        } else {
            let mut grown = Dense::zeros(m, n);
            for j in 0..self.n {
                let src = &self.cells[j * self.m..(j + 1) * self.m];
                grown.cells[j * m..j * m + self.m].copy_from_slice(src);
            }
            grown
        };

        for (cj, &c) in cols.iter().enumerate() {
            for (ri, &r) in rows.iter().enumerate() {
                let v = if value.is_scalar() {
                    value.cells[0]
                } else {
                    value.cells[cj * rows.len() + ri]
                };
                out.cells[c * m + r] = v;
            }
        }
        Ok(out)
    }

    /// Horizontal concatenation.  Empty `0 x 0` blocks are skipped.
    pub fn hcat(blocks: Vec<Self>) -> Result<Self, EvalError> {
        let blocks: Vec<Self> = blocks.into_iter().filter(|b| b.m + b.n > 0).collect();
        let m = match blocks.first() {
            Some(b) => b.m,
            None => return Ok(Dense::zeros(0, 0)),
        };
        if blocks.iter().any(|b| b.m != m) {
            return Err(EvalError::Concatenation);
        }
        let n = blocks.iter().map(|b| b.n).sum();
        let cells = blocks.into_iter().flat_map(|b| b.cells).collect();
        Ok(Dense::new(m, n, cells))
    }

    /// Vertical concatenation.  Empty `0 x 0` blocks are skipped.
    pub fn vcat(blocks: Vec<Self>) -> Result<Self, EvalError> {
        let blocks: Vec<Self> = blocks.into_iter().filter(|b| b.m + b.n > 0).collect();
        let n = match blocks.first() {
            Some(b) => b.n,
            None => return Ok(Dense::zeros(0, 0)),
        };
        if blocks.iter().any(|b| b.n != n) {
            return Err(EvalError::Concatenation);
        }
        let m = blocks.iter().map(|b| b.m).sum();
        let mut cells = Vec::with_capacity(m * n);
        for j in 0..n {
            for b in &blocks {
                cells.extend_from_slice(&b.cells[j * b.m..(j + 1) * b.m]);
            }
        }
        Ok(Dense::new(m, n, cells))
    }
}

/// A numeric engine value, promoted to complex only when needed.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Numeric {
    Real(Dense<f64>),
    Complex(Dense<Complex64>),
}

impl Numeric {
    pub fn from_array(a: &EngineArray) -> Result<Self, EvalError> {
        let (m, n) = a.size();
        match a.data() {
            ArrayData::Real(v) => Ok(Numeric::Real(Dense::new(m, n, v.clone()))),
            ArrayData::Complex(v) => Ok(Numeric::Complex(Dense::new(m, n, v.clone()))),
            ArrayData::SparseReal(A) => Ok(Numeric::Real(Dense::new(m, n, A.to_dense()))),
            ArrayData::SparseComplex(A) => {
                Ok(Numeric::Complex(Dense::new(m, n, A.to_dense())))
            }
            ArrayData::Char(_) => Err(EvalError::Message(
                "Operation is not defined for character arrays.".into(),
            )),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        match self {
            Numeric::Real(d) => (d.m, d.n),
            Numeric::Complex(d) => (d.m, d.n),
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Numeric::Complex(_))
    }

    pub fn into_complex(self) -> Dense<Complex64> {
        match self {
            Numeric::Real(d) => Dense::new(
                d.m,
                d.n,
                d.cells.into_iter().map(|x| Complex64::new(x, 0.0)).collect(),
            ),
            Numeric::Complex(d) => d,
        }
    }

    pub fn into_array(self, sparse: bool) -> EngineArray {
        match (self, sparse) {
            (Numeric::Real(d), false) => EngineArray::from_real(d.m, d.n, d.cells),
            (Numeric::Complex(d), false) => EngineArray::from_complex(d.m, d.n, d.cells),
            (Numeric::Real(d), true) => {
                EngineArray::sparse_real(CscMatrix::from_dense(d.m, d.n, &d.cells))
            }
            (Numeric::Complex(d), true) => {
                EngineArray::sparse_complex(CscMatrix::from_dense(d.m, d.n, &d.cells))
            }
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Numeric::Real(d) => Numeric::Real(d.map(|x| -x)),
            Numeric::Complex(d) => Numeric::Complex(d.map(|x| -x)),
        }
    }

    pub fn binary(self, op: BinOp, other: Self) -> Result<Self, EvalError> {
        match (self, other) {
            (Numeric::Real(a), Numeric::Real(b)) => Ok(Numeric::Real(a.apply(op, b)?)),
            (a, b) => Ok(Numeric::Complex(
                a.into_complex().apply(op, b.into_complex())?,
            )),
        }
    }

    pub fn gather(&self, rows: &[usize], cols: &[usize]) -> Self {
        match self {
            Numeric::Real(d) => Numeric::Real(d.gather(rows, cols)),
            Numeric::Complex(d) => Numeric::Complex(d.gather(rows, cols)),
        }
    }

    pub fn scatter(self, rows: &[usize], cols: &[usize], value: Self) -> Result<Self, EvalError> {
        match (self, value) {
            (Numeric::Real(base), Numeric::Real(v)) => {
                Ok(Numeric::Real(base.scatter(rows, cols, &v)?))
            }
            (base, v) => Ok(Numeric::Complex(base.into_complex().scatter(
                rows,
                cols,
                &v.into_complex(),
            )?)),
        }
    }

    /// Reshape to `m x n` keeping column-major cell order.
    pub fn reshape(self, m: usize, n: usize) -> Self {
        match self {
            Numeric::Real(d) => Numeric::Real(Dense::new(m, n, d.cells)),
            Numeric::Complex(d) => Numeric::Complex(Dense::new(m, n, d.cells)),
        }
    }

    fn concat(
        blocks: Vec<Self>,
        real: fn(Vec<Dense<f64>>) -> Result<Dense<f64>, EvalError>,
        complex: fn(Vec<Dense<Complex64>>) -> Result<Dense<Complex64>, EvalError>,
    ) -> Result<Self, EvalError> {
        if blocks.iter().any(Numeric::is_complex) {
            let blocks = blocks.into_iter().map(Numeric::into_complex).collect();
            Ok(Numeric::Complex(complex(blocks)?))
        } else {
            let blocks = blocks
                .into_iter()
                .filter_map(|b| match b {
                    Numeric::Real(d) => Some(d),
                    Numeric::Complex(_) => None,
                })
                .collect();
            Ok(Numeric::Real(real(blocks)?))
        }
    }

    pub fn hcat(blocks: Vec<Self>) -> Result<Self, EvalError> {
        Self::concat(blocks, Dense::hcat, Dense::hcat)
    }

    pub fn vcat(blocks: Vec<Self>) -> Result<Self, EvalError> {
        Self::concat(blocks, Dense::vcat, Dense::vcat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(m: usize, n: usize, v: &[f64]) -> Dense<f64> {
        Dense::new(m, n, v.to_vec())
    }

    #[test]
    fn test_scalar_expansion() {
        let a = real(1, 1, &[2.0]);
        let b = real(2, 1, &[1.0, 3.0]);
        assert_eq!(a.apply(BinOp::Mul, b).unwrap().cells, vec![2.0, 6.0]);
    }

    #[test]
    fn test_matmul() {
        // [1 2; 3 4] * [1; 1]
        let a = real(2, 2, &[1.0, 3.0, 2.0, 4.0]);
        let b = real(2, 1, &[1.0, 1.0]);
        let c = a.apply(BinOp::Mul, b).unwrap();
        assert_eq!((c.m, c.n), (2, 1));
        assert_eq!(c.cells, vec![3.0, 7.0]);
    }

    #[test]
    fn test_dimension_errors() {
        let a = real(2, 1, &[1.0, 2.0]);
        let b = real(3, 1, &[1.0, 2.0, 3.0]);
        assert_eq!(a.clone().apply(BinOp::Add, b.clone()), Err(EvalError::Dimensions));
        assert_eq!(a.apply(BinOp::Mul, b), Err(EvalError::InnerDimensions));
    }

    #[test]
    fn test_scatter_grows() {
        let base: Dense<f64> = Dense::zeros(0, 0);
        let col = real(2, 1, &[5.0, 6.0]);
        let out = base.scatter(&[0, 1], &[2], &col).unwrap();
        assert_eq!((out.m, out.n), (2, 3));
        assert_eq!(out.cells, vec![0.0, 0.0, 0.0, 0.0, 5.0, 6.0]);
    }

    #[test]
    fn test_concat() {
        let row = Dense::hcat(vec![real(1, 1, &[1.0]), real(1, 2, &[2.0, 3.0])]).unwrap();
        assert_eq!((row.m, row.n), (1, 3));
        let mat = Dense::vcat(vec![row.clone(), row]).unwrap();
        assert_eq!((mat.m, mat.n), (2, 3));
        assert_eq!(mat.cells, vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        assert!(Dense::hcat(vec![real(1, 1, &[1.0]), real(2, 1, &[1.0, 2.0])]).is_err());
    }

    #[test]
    fn test_complex_promotion() {
        let a = Numeric::Real(real(1, 1, &[1.0]));
        let b = Numeric::Complex(Dense::new(1, 1, vec![Complex64::new(0.0, 2.0)]));
        let c = a.binary(BinOp::Add, b).unwrap();
        assert_eq!(
            c,
            Numeric::Complex(Dense::new(1, 1, vec![Complex64::new(1.0, 2.0)]))
        );
    }
}
