//! Console rendering of workspace values.

#![allow(non_snake_case)]

use crate::algebra::{Complex64, CscMatrix, Scalar};
use crate::engine::{ArrayData, EngineArray};

/// `name = value` block as printed for an unsuppressed statement.
pub(super) fn named(name: &str, value: &EngineArray) -> String {
    format!("\n{} =\n\n{}\n", name, body(value))
}

/// The value alone, as printed by `disp`.
pub(super) fn body(value: &EngineArray) -> String {
    let (m, n) = value.size();
    match value.data() {
        ArrayData::Char(rows) => rows.iter().map(|r| format!("{}\n", r)).collect(),
        _ if m * n == 0 && !value.is_sparse() => "     []\n".to_string(),
        ArrayData::Real(v) => grid(m, n, &texts(v)),
        ArrayData::Complex(v) => grid(m, n, &texts(v)),
        ArrayData::SparseReal(A) => sparse_listing(A),
        ArrayData::SparseComplex(A) => sparse_listing(A),
    }
}

fn grid(m: usize, n: usize, cells: &[String]) -> String {
    let width = cells.iter().map(String::len).max().unwrap_or(0) + 4;
    let mut out = String::new();
    for i in 0..m {
        for j in 0..n {
            out.push_str(&format!("{:>w$}", cells[j * m + i], w = width));
        }
        out.push('\n');
    }
    out
}

fn sparse_listing<T: Scalar>(A: &CscMatrix<T>) -> String {
    let (rows, cols, vals) = A.findnz();
    if vals.is_empty() {
        return format!("   All zero sparse: {}x{}\n", A.m, A.n);
    }
    let texts = texts(&vals);
    let width = texts.iter().map(String::len).max().unwrap_or(0) + 4;
    let mut out = String::new();
    for ((r, c), text) in rows.iter().zip(cols.iter()).zip(texts.iter()) {
        out.push_str(&format!(
            "   ({},{}){:>w$}\n",
            r + 1,
            c + 1,
            text,
            w = width
        ));
    }
    out
}

// integer-valued matrices print without decimals, like the engine does
fn texts<T: Scalar>(cells: &[T]) -> Vec<String> {
    let integral = cells
        .iter()
        .all(|v| is_integral(v.re()) && is_integral(v.im()));
    cells
        .iter()
        .map(|v| {
            let z = Complex64::new(v.re(), v.im());
            if z.im == 0.0 && T::from_parts(0.0, 1.0) == T::zero() {
                real_text(z.re, integral)
            } else {
                let sign = if z.im < 0.0 { '-' } else { '+' };
                format!(
                    "{} {} {}i",
                    real_text(z.re, integral),
                    sign,
                    real_text(z.im.abs(), integral)
                )
            }
        })
        .collect()
}

fn is_integral(v: f64) -> bool {
    !v.is_finite() || (v.fract() == 0.0 && v.abs() < 1e9)
}

fn real_text(v: f64, integral: bool) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let text = if v > 0.0 { "Inf" } else { "-Inf" };
        text.to_string()
    } else if integral {
        format!("{}", v as i64)
    } else {
        format!("{:.4}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_integer_row() {
        let v = EngineArray::from_real(1, 2, vec![2.0, 3.0]);
        assert_eq!(named("ans", &v), "\nans =\n\n    2    3\n\n");
    }

    #[test]
    fn test_fractional_column() {
        let v = EngineArray::from_real(2, 1, vec![1.5, -0.25]);
        assert_eq!(body(&v), "     1.5000\n    -0.2500\n");
    }

    #[test]
    fn test_complex_and_empty() {
        let v = EngineArray::from_complex(1, 1, vec![Complex64::new(1.0, -2.0)]);
        assert_eq!(body(&v), "    1 - 2i\n");
        assert_eq!(body(&EngineArray::zeros(0, 3)), "     []\n");
    }

    #[test]
    fn test_sparse_listing() {
        let A = CscMatrix::new(2, 2, vec![0, 1, 1], vec![1], vec![4.0]);
        assert_eq!(body(&EngineArray::sparse_real(A)), "   (2,1)    4\n");
        let Z: CscMatrix<f64> = CscMatrix::spalloc(2, 3, 0);
        assert_eq!(
            body(&EngineArray::sparse_real(Z)),
            "   All zero sparse: 2x3\n"
        );
    }

    #[test]
    fn test_char_rows() {
        let v = EngineArray::from_strings(&["ab", "cd"]);
        assert_eq!(body(&v), "ab\ncd\n");
    }
}
