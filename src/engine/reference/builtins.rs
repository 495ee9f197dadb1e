#![allow(non_snake_case)]

use super::ops::{Dense, Numeric};
use super::EvalError;
use crate::algebra::{CscMatrix, Scalar};
use crate::engine::EngineArray;

const BUILTINS: [&str; 12] = [
    "sparse", "find", "size", "zeros", "ones", "eye", "full", "nnz", "numel", "disp", "error",
    "addpath",
];

pub(super) fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

fn real_values(a: &EngineArray) -> Result<Vec<f64>, EvalError> {
    if a.is_complex() {
        return Err(EvalError::Message("Complex values are not allowed here.".into()));
    }
    a.to_real_cells()
        .ok_or_else(|| EvalError::Message("Numeric input expected.".into()))
}

/// 1-based subscripts to 0-based positions
pub(super) fn index_values(a: &EngineArray) -> Result<Vec<usize>, EvalError> {
    real_values(a)?
        .into_iter()
        .map(|v| {
            if v.is_finite() && v >= 1.0 && v.fract() == 0.0 {
                Ok(v as usize - 1)
            } else {
                Err(EvalError::BadSubscript)
            }
        })
        .collect()
}

fn dim_value(a: &EngineArray) -> Result<usize, EvalError> {
    let v = real_values(a)?;
    match v[..] {
        [d] if d.is_finite() && d.fract() == 0.0 => Ok(d.max(0.0) as usize),
        _ => Err(EvalError::Message("Size inputs must be integer scalars.".into())),
    }
}

fn dims(args: &[EngineArray]) -> Result<(usize, usize), EvalError> {
    match args {
        [] => Ok((1, 1)),
        [k] => {
            let k = dim_value(k)?;
            Ok((k, k))
        }
        [m, n] => Ok((dim_value(m)?, dim_value(n)?)),
        _ => Err(EvalError::Message("Too many size arguments.".into())),
    }
}

/// `zeros(...)` / `ones(...)`
pub(super) fn filled(args: &[EngineArray], value: f64) -> Result<EngineArray, EvalError> {
    let (m, n) = dims(args)?;
    Ok(EngineArray::from_real(m, n, vec![value; m * n]))
}

pub(super) fn eye(args: &[EngineArray]) -> Result<EngineArray, EvalError> {
    let (m, n) = dims(args)?;
    let mut cells = vec![0.0; m * n];
    for k in 0..m.min(n) {
        cells[k * m + k] = 1.0;
    }
    Ok(EngineArray::from_real(m, n, cells))
}

pub(super) fn full(x: &EngineArray) -> Result<EngineArray, EvalError> {
    if x.is_char() {
        return Ok(x.clone());
    }
    Ok(Numeric::from_array(x)?.into_array(false))
}

pub(super) fn nnz(x: &EngineArray) -> Result<EngineArray, EvalError> {
    let count = match Numeric::from_array(x)? {
        Numeric::Real(d) => d.cells.iter().filter(|v| **v != 0.0).count(),
        Numeric::Complex(d) => d.cells.iter().filter(|v| v.norm() != 0.0).count(),
    };
    Ok(EngineArray::scalar(count as f64))
}

pub(super) fn size(args: &[EngineArray], nargout: usize) -> Result<Vec<EngineArray>, EvalError> {
    let (m, n) = match args {
        [x] => x.size(),
        [x, dim] => {
            let extent = match dim_value(dim)? {
                1 => x.m(),
                2 => x.n(),
                0 => return Err(EvalError::Message("Dimension argument must be positive.".into())),
                _ => 1,
            };
            return Ok(vec![EngineArray::scalar(extent as f64)]);
        }
        _ => return Err(EvalError::Message("Wrong number of arguments to size.".into())),
    };
    if nargout <= 1 {
        return Ok(vec![EngineArray::from_real(1, 2, vec![m as f64, n as f64])]);
    }
    let mut out = vec![EngineArray::scalar(m as f64), EngineArray::scalar(n as f64)];
    out.resize(nargout, EngineArray::scalar(1.0));
    Ok(out)
}

/// The forms `sparse(X)`, `sparse(m, n)`, `sparse(i, j, v)` and
/// `sparse(i, j, v, m, n)`.
pub(super) fn sparse(args: &[EngineArray]) -> Result<EngineArray, EvalError> {
    match args {
        [x] if x.is_sparse() => Ok(x.clone()),
        [x] => Ok(Numeric::from_array(x)?.into_array(true)),
        [m, n] => Ok(EngineArray::sparse_real(CscMatrix::spalloc(
            dim_value(m)?,
            dim_value(n)?,
            0,
        ))),
        [i, j, v] => from_triplets(i, j, v, None),
        [i, j, v, m, n] => from_triplets(i, j, v, Some((dim_value(m)?, dim_value(n)?))),
        _ => Err(EvalError::Message("Wrong number of arguments to sparse.".into())),
    }
}

fn from_triplets(
    i: &EngineArray,
    j: &EngineArray,
    v: &EngineArray,
    shape: Option<(usize, usize)>,
) -> Result<EngineArray, EvalError> {
    let I = index_values(i)?;
    let J = index_values(j)?;
    let V = Numeric::from_array(v)?;
    let (vm, vn) = V.size();

    // scalars expand to the common length
    let lens = [I.len(), J.len(), vm * vn];
    let mut vector_lens = lens.iter().filter(|&&l| l != 1);
    let len = match vector_lens.next() {
        Some(&first) => {
            if vector_lens.any(|&l| l != first) {
                return Err(EvalError::Message("Vectors must be the same lengths.".into()));
            }
            first
        }
        None => 1,
    };
    let I = expand(I, len);
    let J = expand(J, len);

    let (m, n) = match shape {
        Some((m, n)) => {
            if I.iter().any(|&r| r >= m) || J.iter().any(|&c| c >= n) {
                return Err(EvalError::Index);
            }
            (m, n)
        }
        None => (
            I.iter().max().map_or(0, |r| r + 1),
            J.iter().max().map_or(0, |c| c + 1),
        ),
    };

    let out = match V {
        Numeric::Real(d) => {
            EngineArray::sparse_real(assemble(m, n, &I, &J, expand(d.cells, len))?)
        }
        Numeric::Complex(d) => {
            EngineArray::sparse_complex(assemble(m, n, &I, &J, expand(d.cells, len))?)
        }
    };
    Ok(out)
}

fn expand<T: Copy>(v: Vec<T>, len: usize) -> Vec<T> {
    if v.len() == 1 && len != 1 {
        vec![v[0]; len]
    } else {
        v
    }
}

fn assemble<T: Scalar>(
    m: usize,
    n: usize,
    I: &[usize],
    J: &[usize],
    V: Vec<T>,
) -> Result<CscMatrix<T>, EvalError> {
    CscMatrix::new_from_triplets(m, n, I, J, &V).map_err(|e| EvalError::Message(e.to_string()))
}

/// `find(X)` with one, two or three outputs.  Nonzeros are reported in
/// column-major order, as a row when `X` is a row vector and as a column
/// otherwise.
pub(super) fn find(x: &EngineArray, nargout: usize) -> Result<Vec<EngineArray>, EvalError> {
    if nargout > 3 {
        return Err(EvalError::TooManyOutputs);
    }
    let (m, n) = x.size();
    let values = Numeric::from_array(x)?;
    let (positions, picked) = match values {
        Numeric::Real(d) => {
            let (pos, vals) = nonzeros(&d);
            (pos, Numeric::Real(Dense::new(vals.len(), 1, vals)))
        }
        Numeric::Complex(d) => {
            let (pos, vals) = nonzeros(&d);
            (pos, Numeric::Complex(Dense::new(vals.len(), 1, vals)))
        }
    };

    let k = positions.len();
    let (rm, rn) = if m == 1 && n != 1 { (1, k) } else { (k, 1) };
    let shaped = |cells: Vec<f64>| EngineArray::from_real(rm, rn, cells);

    let mut out = Vec::with_capacity(3);
    if nargout <= 1 {
        out.push(shaped(positions.iter().map(|&p| (p + 1) as f64).collect()));
        return Ok(out);
    }
    out.push(shaped(positions.iter().map(|&p| (p % m + 1) as f64).collect()));
    out.push(shaped(positions.iter().map(|&p| (p / m + 1) as f64).collect()));
    if nargout == 3 {
        out.push(picked.reshape(rm, rn).into_array(false));
    }
    Ok(out)
}

fn nonzeros<T: Scalar>(d: &Dense<T>) -> (Vec<usize>, Vec<T>) {
    d.cells
        .iter()
        .enumerate()
        .filter(|(_, v)| **v != T::zero())
        .map(|(p, v)| (p, *v))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(v: &[f64]) -> EngineArray {
        EngineArray::from_real(v.len(), 1, v.to_vec())
    }

    #[test]
    fn test_sparse_sums_duplicates() {
        let S = sparse(&[
            col(&[1.0, 1.0, 2.0]),
            col(&[1.0, 1.0, 2.0]),
            col(&[1.5, 2.5, 0.0]),
        ])
        .unwrap();
        // (2,2) holds an explicit zero and is dropped, so the shape is inferred
        // from the indices while the storage keeps only (1,1)
        assert_eq!(S.size(), (2, 2));
        assert_eq!(S.nzmax(), Some(1));
        assert_eq!(S.to_real_cells().unwrap(), vec![4.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sparse_explicit_size() {
        let S = sparse(&[
            col(&[1.0]),
            col(&[1.0]),
            col(&[7.0]),
            EngineArray::scalar(3.0),
            EngineArray::scalar(4.0),
        ])
        .unwrap();
        assert_eq!(S.size(), (3, 4));

        let bad = sparse(&[
            col(&[5.0]),
            col(&[1.0]),
            col(&[7.0]),
            EngineArray::scalar(3.0),
            EngineArray::scalar(4.0),
        ]);
        assert_eq!(bad, Err(EvalError::Index));
    }

    #[test]
    fn test_sparse_rejects_bad_subscripts() {
        let res = sparse(&[col(&[0.0]), col(&[1.0]), col(&[1.0])]);
        assert_eq!(res, Err(EvalError::BadSubscript));
        let res = sparse(&[col(&[1.0, 2.0]), col(&[1.0]), col(&[1.0, 2.0, 3.0])]);
        assert!(res.is_err());
    }

    #[test]
    fn test_find_outputs() {
        // [0 3; -2 0]
        let X = EngineArray::from_real(2, 2, vec![0.0, -2.0, 3.0, 0.0]);
        let out = find(&X, 3).unwrap();
        assert_eq!(out[0].real_cells().unwrap(), &[2.0, 1.0]);
        assert_eq!(out[1].real_cells().unwrap(), &[1.0, 2.0]);
        assert_eq!(out[2].real_cells().unwrap(), &[-2.0, 3.0]);

        let linear = find(&X, 1).unwrap();
        assert_eq!(linear[0].real_cells().unwrap(), &[2.0, 3.0]);
    }

    #[test]
    fn test_find_row_vector_orientation() {
        let X = EngineArray::from_real(1, 3, vec![0.0, 1.0, 1.0]);
        let out = find(&X, 2).unwrap();
        assert_eq!(out[0].size(), (1, 2));
    }

    #[test]
    fn test_size_forms() {
        let X = EngineArray::zeros(2, 3);
        let one = size(&[X.clone()], 1).unwrap();
        assert_eq!(one[0].real_cells().unwrap(), &[2.0, 3.0]);
        let two = size(&[X.clone()], 2).unwrap();
        assert_eq!(two[1].real_cells().unwrap(), &[3.0]);
        let dim = size(&[X, EngineArray::scalar(1.0)], 1).unwrap();
        assert_eq!(dim[0].real_cells().unwrap(), &[2.0]);
    }
}
