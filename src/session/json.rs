#![allow(non_snake_case)]

use super::{Session, SessionError};
use crate::algebra::{CscMatrix, SparseFormatError};
use crate::codec;
use crate::engine::Engine;

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

/// A sparse linear system `A x = b`, serializable as JSON so that a solve
/// can be recorded and replayed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinearSystem {
    pub A: CscMatrix<f64>,
    pub b: Vec<f64>,
}

impl LinearSystem {
    /// # Panics
    /// Panics if `A` is not square or `b` does not match its size.
    pub fn new(A: CscMatrix<f64>, b: Vec<f64>) -> Self {
        assert_eq!(A.m, A.n);
        assert_eq!(A.n, b.len());
        LinearSystem { A, b }
    }

    /// Assemble from 0-based triplets, summing duplicates.  An empty system
    /// is rejected.
    pub fn from_triplets(
        n: usize,
        rows: &[usize],
        cols: &[usize],
        values: &[f64],
        b: Vec<f64>,
    ) -> Result<Self, SparseFormatError> {
        if n == 0 {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        let A = CscMatrix::new_from_triplets(n, n, rows, cols, values)?;
        if b.len() != n {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        Ok(LinearSystem { A, b })
    }

    pub fn n(&self) -> usize {
        self.b.len()
    }

    pub fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let json = serde_json::to_string(self)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let system: LinearSystem = serde_json::from_str(&buffer)?;
        system
            .A
            .check_format()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if system.A.n == 0 || system.A.m != system.A.n || system.A.n != system.b.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                SparseFormatError::IncompatibleDimension,
            ));
        }
        Ok(system)
    }
}

impl<E: Engine> Session<E> {
    /// Solve a recorded linear system, returning the solution.
    pub fn solve_linear_system(&mut self, system: &LinearSystem) -> Result<Vec<f64>, SessionError> {
        let (rows, cols, values) = system.A.findnz();
        let mut x = vec![0.0; system.n()];
        self.solve_sparse_linear_system(system.n(), &rows, &cols, &values, &system.b, &mut x)?;
        Ok(x)
    }

    /// The operands of the most recent solve as a [`LinearSystem`], if
    /// both were assembled.  Available after a failed solve as well.
    pub fn last_linear_system(&self) -> Option<LinearSystem> {
        let A = codec::decode_csc_real(self.retained.lhs.as_ref()?).ok()?;
        let b = self.retained.rhs.as_ref()?.to_real_cells()?;
        Some(LinearSystem { A, b })
    }
}
