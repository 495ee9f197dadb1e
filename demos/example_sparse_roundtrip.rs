#![allow(non_snake_case)]

use engine_bridge::algebra::*;
use engine_bridge::engine::ReferenceEngine;
use engine_bridge::session::*;

fn main() {
    let mut session = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();

    // 3x4 matrix whose last row and column are empty
    let rows = [0usize, 1, 0];
    let cols = [0usize, 1, 2];
    let vals = [3.5, -2.0, 1.0];

    session
        .materialize_sparse_real("S", &rows, &cols, Some(&vals[..]), SparseShape::new(3, 4))
        .unwrap();

    let (m, n, triplets) = session.extract_triplet_real::<usize, f64>("S").unwrap();
    println!("S is {}x{} with {} nonzeros", m, n, triplets.nnz());
    for k in 0..triplets.nnz() {
        println!(
            "  ({}, {}) = {}",
            triplets.rows[k], triplets.cols[k], triplets.values[k]
        );
    }

    let A: CscMatrix<f64> = session.extract_csc_real("S").unwrap();
    println!("CSC: colptr = {:?}, rowval = {:?}", A.colptr, A.rowval);

    // a dense read of the same matrix, row-major
    let mut dense = vec![0.; 12];
    session
        .get_real_matrix("S", 3, 4, &mut dense, Layout::RowMajor)
        .unwrap();
    for row in dense.chunks(4) {
        println!("  {:?}", row);
    }
}
