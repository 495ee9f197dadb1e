#![allow(non_snake_case)]

use super::EvalError;
use crate::algebra::Scalar;

/// Solve `A X = B` for square `A` by Gaussian elimination with partial
/// pivoting.
///
/// `A` is `n x n` and `B` is `n x nrhs`, both column-major.  A pivot whose
/// modulus falls below `n * eps * max|A|` is reported as
/// [`EvalError::Singular`].
pub(super) fn lu_solve<T: Scalar>(
    n: usize,
    mut A: Vec<T>,
    mut B: Vec<T>,
    nrhs: usize,
) -> Result<Vec<T>, EvalError> {
    assert_eq!(A.len(), n * n);
    assert_eq!(B.len(), n * nrhs);

    let anorm = A.iter().map(|a| a.modulus()).fold(0.0, f64::max);
    let tol = (n as f64) * f64::EPSILON * anorm;

    for k in 0..n {
        // pivot row
        let (p, pmax) = (k..n)
            .map(|i| (i, A[k * n + i].modulus()))
            .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if pmax <= tol || !pmax.is_finite() {
            return Err(EvalError::Singular);
        }
        if p != k {
            for j in 0..n {
                A.swap(j * n + k, j * n + p);
            }
            for c in 0..nrhs {
                B.swap(c * n + k, c * n + p);
            }
        }

        let pivot = A[k * n + k];
        for i in (k + 1)..n {
            let l = A[k * n + i] / pivot;
            if l == T::zero() {
                continue;
            }
            for j in (k + 1)..n {
                let akj = A[j * n + k];
                A[j * n + i] -= l * akj;
            }
            for c in 0..nrhs {
                let bk = B[c * n + k];
                B[c * n + i] -= l * bk;
            }
        }
    }

    // back substitution on the upper triangle
    for c in 0..nrhs {
        let col = &mut B[c * n..(c + 1) * n];
        for k in (0..n).rev() {
            let mut s = col[k];
            for j in (k + 1)..n {
                s -= A[j * n + k] * col[j];
            }
            col[k] = s / A[k * n + k];
        }
    }
    Ok(B)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Complex64;

    #[test]
    fn test_lu_diagonal() {
        let x = lu_solve(2, vec![2.0, 0.0, 0.0, 3.0], vec![4.0, 9.0], 1).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_lu_needs_pivoting() {
        // [0 1; 1 0] x = [5; 7]
        let x = lu_solve(2, vec![0.0, 1.0, 1.0, 0.0], vec![5.0, 7.0], 1).unwrap();
        assert_eq!(x, vec![7.0, 5.0]);
    }

    #[test]
    fn test_lu_multiple_rhs() {
        let A = vec![4.0, 2.0, 1.0, 3.0];
        let B = vec![5.0, 5.0, 1.0, 0.0];
        let X = lu_solve(2, A.clone(), B.clone(), 2).unwrap();
        for c in 0..2 {
            for i in 0..2 {
                let ax: f64 = (0..2).map(|j| A[j * 2 + i] * X[c * 2 + j]).sum();
                assert!((ax - B[c * 2 + i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_lu_singular() {
        let res = lu_solve(2, vec![1.0, 1.0, 1.0, 1.0], vec![1.0, 2.0], 1);
        assert_eq!(res, Err(EvalError::Singular));
        let res = lu_solve(1, vec![0.0], vec![1.0], 1);
        assert_eq!(res, Err(EvalError::Singular));
    }

    #[test]
    fn test_lu_complex() {
        let i = Complex64::new(0.0, 1.0);
        let one = Complex64::new(1.0, 0.0);
        // (i) x = 2  =>  x = -2i
        let x = lu_solve(1, vec![i], vec![one * 2.0], 1).unwrap();
        assert!((x[0] - Complex64::new(0.0, -2.0)).norm() < 1e-12);
    }

    #[test]
    fn test_lu_empty() {
        let x: Vec<f64> = lu_solve(0, vec![], vec![], 1).unwrap();
        assert!(x.is_empty());
    }
}
