//! Dense matrix codec.
//!
//! Every function walks the matrix through [`LayoutMap`], so an encode
//! followed by a decode with the same [`Layout`] returns the original buffer.

use super::CodecError;
use crate::algebra::{Complex64, FloatT, IndexT, Layout, LayoutMap};
use crate::engine::EngineArray;
use num_complex::Complex;

fn encode_cells<S: Copy>(
    m: usize,
    n: usize,
    values: Option<&[S]>,
    layout: Layout,
    to_cell: impl Fn(S) -> f64,
) -> EngineArray {
    let mut cells = vec![0.0; m * n];
    if let Some(values) = values {
        assert_eq!(values.len(), m * n);
        for (e, h) in LayoutMap::new(m, n, layout) {
            cells[e] = to_cell(values[h]);
        }
    }
    EngineArray::from_real(m, n, cells)
}

/// Encode an `m x n` real host matrix.
///
/// Values are cast to double precision.  With `values == None` the result
/// is an `m x n` matrix of zeros, usable as a placeholder.
///
/// # Panics
/// Panics if `values` does not hold `m*n` entries.
pub fn encode_real<T: FloatT>(
    m: usize,
    n: usize,
    values: Option<&[T]>,
    layout: Layout,
) -> EngineArray {
    encode_cells(m, n, values, layout, T::to_cell)
}

/// Encode an `m x n` matrix of 0-based indices, shifting every entry by +1.
///
/// # Panics
/// Panics if `values` does not hold `m*n` entries.
pub fn encode_index<I: IndexT>(
    m: usize,
    n: usize,
    values: Option<&[I]>,
    layout: Layout,
) -> EngineArray {
    encode_cells(m, n, values, layout, I::to_engine_index)
}

/// Encode an `m x n` complex host matrix.  The result is complex even
/// when every imaginary part is zero.
///
/// # Panics
/// Panics if `values` does not hold `m*n` entries.
pub fn encode_complex<T: FloatT>(
    m: usize,
    n: usize,
    values: Option<&[Complex<T>]>,
    layout: Layout,
) -> EngineArray {
    let mut cells = vec![Complex64::new(0.0, 0.0); m * n];
    if let Some(values) = values {
        assert_eq!(values.len(), m * n);
        for (e, h) in LayoutMap::new(m, n, layout) {
            let v = values[h];
            cells[e] = Complex64::new(v.re.to_cell(), v.im.to_cell());
        }
    }
    EngineArray::from_complex(m, n, cells)
}

fn check_shape(handle: &EngineArray, m: usize, n: usize) -> Result<(), CodecError> {
    if handle.size() != (m, n) {
        return Err(CodecError::DimensionMismatch {
            expected: (m, n),
            actual: handle.size(),
        });
    }
    Ok(())
}

fn real_cells(handle: &EngineArray) -> Result<Vec<f64>, CodecError> {
    handle.to_real_cells().ok_or(CodecError::NotNumeric)
}

fn complex_cells(handle: &EngineArray) -> Result<Vec<Complex64>, CodecError> {
    handle.to_complex_cells().ok_or(CodecError::NotNumeric)
}

/// Decode an engine matrix into a real host buffer of shape `m x n`.
///
/// Fails with [`CodecError::DimensionMismatch`] if the engine matrix has
/// any other shape, in which case `dest` is left untouched.  Sparse values
/// are expanded and complex values contribute their real parts.
///
/// # Panics
/// Panics if `dest` does not hold `m*n` entries.
pub fn decode_real<T: FloatT>(
    handle: &EngineArray,
    m: usize,
    n: usize,
    dest: &mut [T],
    layout: Layout,
) -> Result<(), CodecError> {
    check_shape(handle, m, n)?;
    assert_eq!(dest.len(), m * n);
    let cells = real_cells(handle)?;
    for (e, h) in LayoutMap::new(m, n, layout) {
        dest[h] = T::from_cell(cells[e]);
    }
    Ok(())
}

/// Decode an engine matrix of 1-based indices into 0-based host indices.
///
/// Every cell is validated before `dest` is written, so a cell that is not
/// a valid index leaves `dest` untouched.
///
/// # Panics
/// Panics if `dest` does not hold `m*n` entries.
pub fn decode_index<I: IndexT>(
    handle: &EngineArray,
    m: usize,
    n: usize,
    dest: &mut [I],
    layout: Layout,
) -> Result<(), CodecError> {
    check_shape(handle, m, n)?;
    assert_eq!(dest.len(), m * n);
    let cells = real_cells(handle)?
        .into_iter()
        .map(|v| I::from_engine_index(v).ok_or(CodecError::BadIndex(v)))
        .collect::<Result<Vec<I>, _>>()?;
    for (e, h) in LayoutMap::new(m, n, layout) {
        dest[h] = cells[e];
    }
    Ok(())
}

/// Decode an engine matrix into a complex host buffer of shape `m x n`.
///
/// A real engine matrix decodes with zero imaginary parts.
///
/// # Panics
/// Panics if `dest` does not hold `m*n` entries.
pub fn decode_complex<T: FloatT>(
    handle: &EngineArray,
    m: usize,
    n: usize,
    dest: &mut [Complex<T>],
    layout: Layout,
) -> Result<(), CodecError> {
    check_shape(handle, m, n)?;
    assert_eq!(dest.len(), m * n);
    let cells = complex_cells(handle)?;
    for (e, h) in LayoutMap::new(m, n, layout) {
        let z = cells[e];
        dest[h] = Complex::new(T::from_cell(z.re), T::from_cell(z.im));
    }
    Ok(())
}

/// Decode a real matrix of whatever shape the engine holds, returning
/// `(m, n, values)`.
pub fn decode_real_sized<T: FloatT>(
    handle: &EngineArray,
    layout: Layout,
) -> Result<(usize, usize, Vec<T>), CodecError> {
    let (m, n) = handle.size();
    let mut dest = vec![T::zero(); m * n];
    decode_real(handle, m, n, &mut dest, layout)?;
    Ok((m, n, dest))
}

/// Index-kind counterpart of [`decode_real_sized`].
pub fn decode_index_sized<I: IndexT>(
    handle: &EngineArray,
    layout: Layout,
) -> Result<(usize, usize, Vec<I>), CodecError> {
    let (m, n) = handle.size();
    let mut dest = vec![I::zero(); m * n];
    decode_index(handle, m, n, &mut dest, layout)?;
    Ok((m, n, dest))
}

/// Complex counterpart of [`decode_real_sized`].
pub fn decode_complex_sized<T: FloatT>(
    handle: &EngineArray,
    layout: Layout,
) -> Result<(usize, usize, Vec<Complex<T>>), CodecError> {
    let (m, n) = handle.size();
    let mut dest = vec![Complex::new(T::zero(), T::zero()); m * n];
    decode_complex(handle, m, n, &mut dest, layout)?;
    Ok((m, n, dest))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUTS: [Layout; 2] = [Layout::RowMajor, Layout::ColumnMajor];

    #[test]
    fn test_real_round_trip() {
        for layout in LAYOUTS {
            for (m, n) in [(1, 1), (1, 4), (4, 1), (2, 3), (3, 2), (5, 5)] {
                let host: Vec<f64> = (0..m * n).map(|k| k as f64 * 0.5 - 3.0).collect();
                let handle = encode_real(m, n, Some(&host[..]), layout);
                let mut back = vec![0.0; m * n];
                decode_real(&handle, m, n, &mut back, layout).unwrap();
                assert_eq!(host, back);
            }
        }
    }

    #[test]
    fn test_engine_storage_is_column_major() {
        // [1 2 3; 4 5 6] row-major
        let handle = encode_real(2, 3, Some(&[1.0f32, 2., 3., 4., 5., 6.][..]), Layout::RowMajor);
        assert_eq!(handle.real_cells().unwrap(), &[1., 4., 2., 5., 3., 6.]);
    }

    #[test]
    fn test_index_shift() {
        let handle = encode_index(3, 1, Some(&[0u32, 5, 2][..]), Layout::ColumnMajor);
        assert_eq!(handle.real_cells().unwrap(), &[1.0, 6.0, 3.0]);
        let mut back = [9u32; 3];
        decode_index(&handle, 3, 1, &mut back, Layout::ColumnMajor).unwrap();
        assert_eq!(back, [0, 5, 2]);
    }

    #[test]
    fn test_bad_index_leaves_dest_untouched() {
        let handle = EngineArray::from_real(1, 2, vec![3.0, 0.0]);
        let mut dest = [7usize; 2];
        let res = decode_index(&handle, 1, 2, &mut dest, Layout::RowMajor);
        assert_eq!(res, Err(CodecError::BadIndex(0.0)));
        assert_eq!(dest, [7, 7]);
    }

    #[test]
    fn test_complex_round_trip() {
        for layout in LAYOUTS {
            let host: Vec<Complex<f64>> =
                (0..6).map(|k| Complex::new(k as f64, -(k as f64))).collect();
            let handle = encode_complex(3, 2, Some(&host[..]), layout);
            assert!(handle.is_complex());
            let (m, n, back) = decode_complex_sized::<f64>(&handle, layout).unwrap();
            assert_eq!((m, n), (3, 2));
            assert_eq!(host, back);
        }
    }

    #[test]
    fn test_complex_from_real_handle() {
        let handle = EngineArray::from_real(1, 2, vec![1.5, -2.0]);
        let mut dest = [Complex::new(9.0f64, 9.0); 2];
        decode_complex(&handle, 1, 2, &mut dest, Layout::RowMajor).unwrap();
        assert_eq!(dest, [Complex::new(1.5, 0.0), Complex::new(-2.0, 0.0)]);
    }

    #[test]
    fn test_complex_placeholder_is_complex() {
        let handle = encode_complex::<f64>(2, 2, None, Layout::RowMajor);
        assert!(handle.is_complex());
        assert_eq!(handle.to_real_cells().unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn test_dimension_mismatch_leaves_dest_untouched() {
        let handle = encode_real(2, 3, Some(&[1.0f64; 6][..]), Layout::RowMajor);
        let mut dest = [-1.0f64; 9];
        let res = decode_real(&handle, 3, 3, &mut dest, Layout::RowMajor);
        assert_eq!(
            res,
            Err(CodecError::DimensionMismatch {
                expected: (3, 3),
                actual: (2, 3)
            })
        );
        assert!(dest.iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_placeholder_and_narrowing() {
        let handle = encode_real::<f32>(2, 2, None, Layout::ColumnMajor);
        assert_eq!(handle.real_cells().unwrap(), &[0.0; 4]);

        let third = 1.0f64 / 3.0;
        let handle = encode_real(1, 1, Some(&[third][..]), Layout::RowMajor);
        let (_, _, back) = decode_real_sized::<f32>(&handle, Layout::RowMajor).unwrap();
        assert_eq!(back[0], third as f32);
    }

    #[test]
    fn test_char_is_not_numeric() {
        let handle = EngineArray::from_strings(&["ab"]);
        let mut dest = [0.0f64; 2];
        assert_eq!(
            decode_real(&handle, 1, 2, &mut dest, Layout::RowMajor),
            Err(CodecError::NotNumeric)
        );
    }
}
