use super::{Session, SessionError, SolveHandles, SparseShape};
use crate::algebra::{FloatT, IndexT, Layout};
use crate::codec;
use crate::engine::Engine;

/// Engine variable names of one solve, e.g. `LS_A`, `LS_b` and `LS_x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveNames {
    pub lhs: String,
    pub rhs: String,
    pub solution: String,
}

impl SolveNames {
    pub fn new(prefix: &str) -> Self {
        SolveNames {
            lhs: format!("{}_A", prefix),
            rhs: format!("{}_b", prefix),
            solution: format!("{}_x", prefix),
        }
    }
}

impl<E: Engine> Session<E> {
    /// Solve the `n x n` sparse system `A x = b` on the engine.
    ///
    /// `A` is given as 0-based triplets `(rows, cols, values)`; entries at
    /// the same position are summed.  The solve runs in six steps, none of
    /// which is retried:
    ///
    /// 1. clear every engine variable with the solve prefix and release the
    ///    operands retained from the previous solve
    /// 2. assemble `A` as an `n x n` sparse matrix
    /// 3. transfer `b`
    /// 4. left-divide on the engine
    /// 5. check that the engine produced a solution
    /// 6. decode the solution into `x`
    ///
    /// Any failure aborts the solve and leaves `x` untouched.  A singular
    /// system is reported as [`SessionError::SolveEngine`], as are a
    /// system matrix the engine did not assemble as an `n x n` sparse
    /// matrix and a solution with non-finite entries.
    ///
    /// # Panics
    /// Panics if `n` is zero, if the triplet arrays differ in length, or if
    /// `b` or `x` does not have length `n`.
    ///
    /// ```
    /// # #[cfg(feature = "reference-engine")] {
    /// use engine_bridge::engine::ReferenceEngine;
    /// use engine_bridge::session::{Session, SessionSettings};
    ///
    /// let mut session = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
    /// let mut x: [f64; 2] = [0.0; 2];
    /// session
    ///     .solve_sparse_linear_system(2, &[0usize, 1], &[0, 1], &[2.0, 3.0], &[4.0, 9.0], &mut x)
    ///     .unwrap();
    /// assert!((x[0] - 2.0).abs() < 1e-9 && (x[1] - 3.0).abs() < 1e-9);
    /// # }
    /// ```
    pub fn solve_sparse_linear_system<I: IndexT, T: FloatT>(
        &mut self,
        n: usize,
        rows: &[I],
        cols: &[I],
        values: &[T],
        b: &[T],
        x: &mut [T],
    ) -> Result<(), SessionError> {
        assert!(n > 0);
        assert_eq!(rows.len(), values.len());
        assert_eq!(cols.len(), values.len());
        assert_eq!(b.len(), n);
        assert_eq!(x.len(), n);

        let names = SolveNames::new(&self.settings.solve_prefix);
        let res = self.solve_steps(&names, n, rows, cols, values, b, x);
        if let Err(ref e) = res {
            self.error(format_args!("sparse linear solve failed: {}", e));
        }
        res
    }

    #[allow(clippy::too_many_arguments)]
    fn solve_steps<I: IndexT, T: FloatT>(
        &mut self,
        names: &SolveNames,
        n: usize,
        rows: &[I],
        cols: &[I],
        values: &[T],
        b: &[T],
        x: &mut [T],
    ) -> Result<(), SessionError> {
        // 1. clear
        self.retained = SolveHandles::default();
        self.command(&format!("clear {}_*;", self.settings.solve_prefix))?;

        // 2. assemble LHS
        self.materialize_sparse_real(&names.lhs, rows, cols, Some(values), SparseShape::square(n))?;
        // an engine that swallows a failed conversion leaves the triplets behind
        let lhs = self
            .get(&names.lhs)
            .filter(|lhs| lhs.is_sparse())
            .ok_or_else(|| SessionError::SolveEngine {
                command: names.lhs.clone(),
                reason: "system matrix was not assembled".to_string(),
            })?;
        if lhs.size() != (n, n) {
            return Err(SessionError::SolveEngine {
                command: names.lhs.clone(),
                reason: format!("system matrix assembled with shape {:?}", lhs.size()),
            });
        }
        self.retained.lhs = Some(lhs);

        // 3. assemble RHS
        let rhs = codec::encode_real(n, 1, Some(b), Layout::ColumnMajor);
        self.put(&names.rhs, &rhs)?;
        self.retained.rhs = Some(rhs);

        // 4. solve
        let command = format!("{} = {} \\ {};", names.solution, names.lhs, names.rhs);
        self.command(&command)?;

        // 5. verify
        let solution = self.get(&names.solution).ok_or_else(|| SessionError::SolveEngine {
            command: command.clone(),
            reason: "no solution was produced".to_string(),
        })?;

        // 6. retrieve
        let mut sol = vec![T::zero(); n];
        let decoded = codec::decode_real(&solution, n, 1, &mut sol, Layout::ColumnMajor);
        self.retained.solution = Some(solution);
        decoded.map_err(|e| SessionError::from_codec(&names.solution, e))?;
        if !sol.iter().all(|v| v.is_finite()) {
            return Err(SessionError::SolveEngine {
                command,
                reason: "solution has non-finite entries".to_string(),
            });
        }
        x.copy_from_slice(&sol);
        Ok(())
    }
}
