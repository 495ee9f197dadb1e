#![allow(non_snake_case)]

use super::script::normalize_output;
use super::{Session, SessionError, SparseShape};
use crate::algebra::{CscMatrix, FloatT, IndexT};
use crate::codec::{self, Triplets};
use crate::engine::{Engine, EngineArray};
use num_complex::Complex;

/// Parse the console output of `size(X)`, e.g. `"ans =\n\n     3     4\n"`,
/// into `(3, 4)`.  Both dimensions must be positive.
pub fn parse_size_output(text: &str) -> Option<(usize, usize)> {
    let mut tokens = text.split_whitespace();
    if tokens.next()? != "ans" || tokens.next()? != "=" {
        return None;
    }
    let m: i64 = tokens.next()?.parse().ok()?;
    let n: i64 = tokens.next()?.parse().ok()?;
    if m <= 0 || n <= 0 {
        return None;
    }
    Some((m as usize, n as usize))
}

impl<E: Engine> Session<E> {
    /// Shape of the engine variable `name`, learned from the console output
    /// of a size query.
    ///
    /// Fails with [`SessionError::NotFound`] if the query fails or does not
    /// report two positive dimensions.
    pub fn dimension_query(&mut self, name: &str) -> Result<(usize, usize), SessionError> {
        let not_found = |reason: String| SessionError::NotFound {
            name: name.to_string(),
            reason,
        };
        let command = format!("size({})", name);
        let capacity = self.settings.size_query_capacity;
        let text = self
            .eval_captured(&command, capacity)
            .map_err(|e| not_found(e.to_string()))?;
        let text = normalize_output(&text, &self.settings.prompt);
        parse_size_output(&text).ok_or_else(|| not_found(format!("size query returned {:?}", text)))
    }

    /// Bind `name` to an `m x n` sparse matrix with no nonzeros.
    pub fn create_zero_sparse(&mut self, name: &str, m: usize, n: usize) -> Result<(), SessionError> {
        self.command(&format!("{} = sparse({}, {});", name, m, n))
    }

    /// Put the `nnz x 3` real triplet encoding under `name` without
    /// converting it to a sparse matrix.  `None` puts an empty `0 x 3`
    /// placeholder.
    pub fn set_encoded_sparse_real<I: IndexT, T: FloatT>(
        &mut self,
        name: &str,
        rows: &[I],
        cols: &[I],
        values: Option<&[T]>,
    ) -> Result<(), SessionError> {
        self.put(name, &codec::encode_triplet_real(rows, cols, values))
    }

    /// Complex counterpart of [`set_encoded_sparse_real`](Self::set_encoded_sparse_real).
    pub fn set_encoded_sparse_complex<I: IndexT, T: FloatT>(
        &mut self,
        name: &str,
        rows: &[I],
        cols: &[I],
        values: Option<&[Complex<T>]>,
    ) -> Result<(), SessionError> {
        self.put(name, &codec::encode_triplet_complex(rows, cols, values))
    }

    fn convert_triplets(&mut self, name: &str, shape: SparseShape) -> Result<(), SessionError> {
        if shape.dims().is_none() {
            self.warn(format_args!(
                "sparse matrix {} assembled without explicit dimensions; trailing empty rows or columns are lost",
                name
            ));
        }
        self.command(&shape.sparse_command(name))
    }

    /// Assemble a real sparse matrix on the engine from 0-based triplets
    /// and bind it to `name`.
    ///
    /// The triplets are transferred as an `nnz x 3` matrix and converted by
    /// the engine.  Entries at the same position are summed.  `None` for
    /// `values` yields a matrix with no nonzeros.
    ///
    /// Fails with [`SessionError::Transfer`] if the triplets cannot be
    /// transferred and with [`SessionError::SolveEngine`] if the engine
    /// rejects the conversion, e.g. for an index outside `shape`.
    pub fn materialize_sparse_real<I: IndexT, T: FloatT>(
        &mut self,
        name: &str,
        rows: &[I],
        cols: &[I],
        values: Option<&[T]>,
        shape: SparseShape,
    ) -> Result<(), SessionError> {
        self.set_encoded_sparse_real(name, rows, cols, values)?;
        self.convert_triplets(name, shape)
    }

    /// Complex counterpart of [`materialize_sparse_real`](Self::materialize_sparse_real).
    pub fn materialize_sparse_complex<I: IndexT, T: FloatT>(
        &mut self,
        name: &str,
        rows: &[I],
        cols: &[I],
        values: Option<&[Complex<T>]>,
        shape: SparseShape,
    ) -> Result<(), SessionError> {
        self.set_encoded_sparse_complex(name, rows, cols, values)?;
        self.convert_triplets(name, shape)
    }

    // Expand `name` into an auxiliary triplet variable, fetch it and clear
    // it again.  The shape comes from a dimension query issued first.
    fn fetch_triplets(
        &mut self,
        name: &str,
    ) -> Result<(usize, usize, EngineArray), SessionError> {
        let (m, n) = self.dimension_query(name)?;

        let aux = format!("{}{}", self.settings.scratch_prefix, name);
        let expand = format!(
            "clear {0}; [{0}(:, 1), {0}(:, 2), {0}(:, 3)] = find({1});",
            aux, name
        );
        let handle = match self.eval(&expand) {
            Ok(()) => self.get(&aux),
            Err(_) => None,
        };
        if self.eval(&format!("clear {};", aux)).is_err() {
            self.warn(format_args!("auxiliary variable {} could not be cleared", aux));
        }

        match handle {
            Some(handle) => Ok((m, n, handle)),
            None => Err(SessionError::NotFound {
                name: name.to_string(),
                reason: "nonzeros could not be enumerated".to_string(),
            }),
        }
    }

    /// Read the real sparse matrix `name` as `(m, n, triplets)` with
    /// 0-based indices in column-major order.
    ///
    /// Works on any engine since only dense values cross the boundary.
    pub fn extract_triplet_real<I: IndexT, T: FloatT>(
        &mut self,
        name: &str,
    ) -> Result<(usize, usize, Triplets<I, T>), SessionError> {
        let (m, n, handle) = self.fetch_triplets(name)?;
        let triplets = codec::decode_triplet_real(&handle).map_err(|e| SessionError::NotFound {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok((m, n, triplets))
    }

    /// Complex counterpart of [`extract_triplet_real`](Self::extract_triplet_real).
    pub fn extract_triplet_complex<I: IndexT, T: FloatT>(
        &mut self,
        name: &str,
    ) -> Result<(usize, usize, Triplets<I, Complex<T>>), SessionError> {
        let (m, n, handle) = self.fetch_triplets(name)?;
        let triplets = codec::decode_triplet_complex(&handle).map_err(|e| SessionError::NotFound {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok((m, n, triplets))
    }

    fn fetch_sparse(&mut self, name: &str) -> Result<EngineArray, SessionError> {
        match self.get(name) {
            Some(handle) if handle.is_sparse() => Ok(handle),
            _ => {
                self.warn(format_args!("matrix {} could not be loaded", name));
                Err(SessionError::NotFound {
                    name: name.to_string(),
                    reason: "not a sparse matrix".to_string(),
                })
            }
        }
    }

    /// Read the engine's native CSC arrays of the real sparse matrix `name`.
    pub fn extract_csc_real<T: FloatT>(&mut self, name: &str) -> Result<CscMatrix<T>, SessionError> {
        let handle = self.fetch_sparse(name)?;
        codec::decode_csc_real(&handle).map_err(|e| SessionError::from_codec(name, e))
    }

    pub fn extract_csc_complex<T: FloatT>(
        &mut self,
        name: &str,
    ) -> Result<CscMatrix<Complex<T>>, SessionError> {
        let handle = self.fetch_sparse(name)?;
        codec::decode_csc_complex(&handle).map_err(|e| SessionError::from_codec(name, e))
    }

    /// Write `A` directly in the engine's native sparse form.
    pub fn put_csc_real<T: FloatT>(&mut self, name: &str, A: &CscMatrix<T>) -> Result<(), SessionError> {
        self.put(name, &codec::encode_csc_real(A))
    }

    pub fn put_csc_complex<T: FloatT>(
        &mut self,
        name: &str,
        A: &CscMatrix<Complex<T>>,
    ) -> Result<(), SessionError> {
        self.put(name, &codec::encode_csc_complex(A))
    }
}

#[cfg(all(test, feature = "reference-engine"))]
mod tests {
    use super::*;
    use crate::engine::ReferenceEngine;
    use crate::io::ConfigurablePrintTarget;
    use crate::session::SessionSettings;

    fn session() -> Session<ReferenceEngine> {
        Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap()
    }

    #[test]
    fn test_parse_size_output() {
        assert_eq!(parse_size_output("ans =\n\n     3     4\n\n"), Some((3, 4)));
        assert_eq!(parse_size_output("ans =\n\n     0     4\n"), None);
        assert_eq!(parse_size_output("ans =\n\n     3\n"), None);
        assert_eq!(parse_size_output("x =\n\n     3     4\n"), None);
        assert_eq!(parse_size_output("Error: Undefined variable X"), None);
        assert_eq!(parse_size_output(""), None);
    }

    #[test]
    fn test_dimension_query() {
        let mut s = session();
        s.create_zero_sparse("Z", 4, 7).unwrap();
        assert_eq!(s.dimension_query("Z").unwrap(), (4, 7));
        assert!(matches!(
            s.dimension_query("missing"),
            Err(SessionError::NotFound { .. })
        ));
    }

    #[test]
    fn test_materialize_and_extract() {
        let mut s = session();
        s.materialize_sparse_real(
            "A",
            &[0usize, 2, 0],
            &[0usize, 1, 0],
            Some(&[1.0f64, 4.0, 2.0][..]),
            SparseShape::Explicit { rows: 4, cols: 3 },
        )
        .unwrap();

        let (m, n, t) = s.extract_triplet_real::<usize, f64>("A").unwrap();
        assert_eq!((m, n), (4, 3));
        // duplicates at (0,0) are summed
        assert_eq!(t.rows, vec![0, 2]);
        assert_eq!(t.cols, vec![0, 1]);
        assert_eq!(t.values, vec![3.0, 4.0]);
        assert!(s.get("temp_A").is_none());

        let csc = s.extract_csc_real::<f64>("A").unwrap();
        assert_eq!(csc.size(), (4, 3));
        assert_eq!(csc.colptr, vec![0, 1, 2, 2]);
        assert_eq!(csc.nzval, vec![3.0, 4.0]);
    }

    #[test]
    fn test_out_of_range_index_fails_conversion() {
        let mut s = session();
        let res = s.materialize_sparse_real(
            "A",
            &[5usize],
            &[0usize],
            Some(&[1.0f64][..]),
            SparseShape::square(2),
        );
        assert!(matches!(res, Err(SessionError::SolveEngine { .. })));
    }

    #[test]
    fn test_placeholder_materializes_empty() {
        let mut s = session();
        s.materialize_sparse_real::<usize, f64>("E", &[], &[], None, SparseShape::new(3, 2))
            .unwrap();
        let csc = s.extract_csc_real::<f64>("E").unwrap();
        assert_eq!(csc.size(), (3, 2));
        assert_eq!(csc.nnz(), 0);

        let (m, n, t) = s.extract_triplet_real::<u32, f64>("E").unwrap();
        assert_eq!((m, n), (3, 2));
        assert!(t.is_empty());
    }

    #[test]
    fn test_encoded_only() {
        let mut s = session();
        s.set_encoded_sparse_real("T", &[1u32], &[0u32], Some(&[9.0f64][..]))
            .unwrap();
        let handle = s.get("T").unwrap();
        assert!(!handle.is_sparse());
        assert_eq!(handle.real_cells().unwrap(), &[2.0, 1.0, 9.0]);
    }

    #[test]
    fn test_csc_requires_sparse() {
        let mut s = session();
        s.print_to_sink();
        s.put_real_matrix("D", 1, 1, Some(&[1.0][..]), crate::algebra::Layout::RowMajor)
            .unwrap();
        assert!(matches!(
            s.extract_csc_real::<f64>("D"),
            Err(SessionError::NotFound { .. })
        ));
        assert!(matches!(
            s.extract_csc_real::<f64>("nothing"),
            Err(SessionError::NotFound { .. })
        ));
    }

    #[test]
    fn test_csc_direct_write() {
        let mut s = session();
        let A = CscMatrix::new(
            2,
            2,
            vec![0, 1, 2],
            vec![1, 0],
            vec![Complex::new(1.0, 1.0), Complex::new(2.0, 0.0)],
        );
        s.put_csc_complex("C", &A).unwrap();
        assert_eq!(s.dimension_query("C").unwrap(), (2, 2));
        let (_, _, t) = s.extract_triplet_complex::<usize, f64>("C").unwrap();
        assert_eq!(t.rows, vec![1, 0]);
        assert_eq!(t.values[0], Complex::new(1.0, 1.0));
        let B: CscMatrix<Complex<f64>> = s.extract_csc_complex("C").unwrap();
        assert_eq!(A, B);
    }
}
