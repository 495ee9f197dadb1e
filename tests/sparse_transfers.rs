#![cfg(feature = "reference-engine")]
#![allow(non_snake_case)]

use engine_bridge::{
    algebra::*,
    engine::ReferenceEngine,
    io::ConfigurablePrintTarget,
    session::{Session, SessionError, SessionSettings, SparseShape},
};
use itertools::izip;
use num_complex::Complex;

fn session() -> Session<ReferenceEngine> {
    let mut s = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
    s.print_to_buffer();
    s
}

fn sorted_entries<V: Copy + PartialOrd>(rows: &[usize], cols: &[usize], vals: &[V]) -> Vec<(usize, usize, V)> {
    let mut entries: Vec<_> = izip!(rows, cols, vals).map(|(&r, &c, &v)| (r, c, v)).collect();
    entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    entries
}

#[test]
fn test_triplet_round_trip() {
    let mut s = session();
    let (rows, cols, vals) = (vec![0usize, 1], vec![1usize, 0], vec![3.5, -2.0]);
    s.materialize_sparse_real("S", &rows, &cols, Some(&vals[..]), SparseShape::new(2, 2))
        .unwrap();

    let (m, n, t) = s.extract_triplet_real::<usize, f64>("S").unwrap();
    assert_eq!((m, n), (2, 2));
    assert_eq!(
        sorted_entries(&t.rows, &t.cols, &t.values),
        sorted_entries(&rows, &cols, &vals)
    );
}

#[test]
#[allow(deprecated)]
fn test_inferred_dimensions_shrink() {
    // a lone nonzero at (0,0) with no explicit size is inferred as 1x1,
    // whatever size the caller had in mind
    let mut s = session();
    s.materialize_sparse_real("S", &[0u32], &[0u32], Some(&[1.0][..]), SparseShape::new(0, 0))
        .unwrap();
    assert_eq!(s.dimension_query("S").unwrap(), (1, 1));
    assert!(s.get_print_buffer().unwrap().starts_with("WARNING:"));

    s.materialize_sparse_real("T", &[2u32], &[0u32], Some(&[1.0][..]), SparseShape::Inferred)
        .unwrap();
    assert_eq!(s.dimension_query("T").unwrap(), (3, 1));
}

#[test]
fn test_explicit_dimensions_keep_empty_trailing_rows() {
    let mut s = session();
    s.materialize_sparse_real(
        "S",
        &[0u32],
        &[0u32],
        Some(&[1.0][..]),
        SparseShape::Explicit { rows: 5, cols: 4 },
    )
    .unwrap();
    let A = s.extract_csc_real::<f64>("S").unwrap();
    assert_eq!(A.size(), (5, 4));
    assert_eq!(A.nnz(), 1);
    assert!(s.get_print_buffer().unwrap().is_empty());
}

#[test]
fn test_triplet_and_csc_extraction_agree() {
    let mut s = session();
    let rows = [3usize, 0, 2, 2, 1];
    let cols = [0usize, 0, 1, 3, 3];
    let vals = [1.0, -1.0, 2.5, 4.0, 8.0];
    s.materialize_sparse_real("S", &rows, &cols, Some(&vals[..]), SparseShape::new(4, 4))
        .unwrap();

    let (_, _, t) = s.extract_triplet_real::<usize, f64>("S").unwrap();
    let A = s.extract_csc_real::<f64>("S").unwrap();
    let (r, c, v) = A.findnz();
    assert_eq!((t.rows, t.cols, t.values), (r, c, v));

    let B = CscMatrix::new_from_triplets(4, 4, &rows, &cols, &vals).unwrap();
    assert_eq!(A, B);
}

#[test]
fn test_complex_sparse() {
    let mut s = session();
    let vals = [Complex::new(1.0, -1.0), Complex::new(0.0, 2.0)];
    s.materialize_sparse_complex("C", &[1u64, 0], &[0u64, 2], Some(&vals[..]), SparseShape::new(2, 3))
        .unwrap();
    assert!(s.get("C").unwrap().is_complex());

    let (m, n, t) = s.extract_triplet_complex::<u64, f64>("C").unwrap();
    assert_eq!((m, n), (2, 3));
    assert_eq!(t.rows, vec![1, 0]);
    assert_eq!(t.cols, vec![0, 2]);
    assert_eq!(t.values, vals.to_vec());

    let A = s.extract_csc_complex::<f64>("C").unwrap();
    assert_eq!(A.colptr, vec![0, 1, 1, 2]);

    // real view of complex values keeps the real parts
    let R = s.extract_csc_real::<f64>("C").unwrap();
    assert_eq!(R.nzval, vec![1.0, 0.0]);
}

#[test]
fn test_zero_sparse_and_placeholder() {
    let mut s = session();
    s.create_zero_sparse("Z", 3, 6).unwrap();
    let Z = s.extract_csc_real::<f64>("Z").unwrap();
    assert_eq!(Z.size(), (3, 6));
    assert_eq!(Z.nnz(), 0);

    s.materialize_sparse_complex::<usize, f64>("W", &[], &[], None, SparseShape::new(2, 2))
        .unwrap();
    let W = s.extract_csc_complex::<f64>("W").unwrap();
    assert_eq!(W.size(), (2, 2));
    assert_eq!(W.nnz(), 0);
}

#[test]
fn test_csc_direct_write_then_triplets() {
    let mut s = session();
    let A = CscMatrix::new(3, 2, vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0]);
    s.put_csc_real("A", &A).unwrap();
    let (m, n, t) = s.extract_triplet_real::<i32, f32>("A").unwrap();
    assert_eq!((m, n), (3, 2));
    assert_eq!(t.rows, vec![0, 2, 1]);
    assert_eq!(t.cols, vec![0, 0, 1]);
    assert_eq!(t.values, vec![1.0f32, 2.0, 3.0]);
}

#[test]
fn test_missing_matrix_not_found() {
    let mut s = session();
    assert!(matches!(
        s.extract_triplet_real::<usize, f64>("nothing"),
        Err(SessionError::NotFound { .. })
    ));
    assert!(matches!(
        s.extract_csc_real::<f64>("nothing"),
        Err(SessionError::NotFound { .. })
    ));
}

#[test]
fn test_empty_matrix_not_found() {
    // a 0x0 value fails the dimension query
    let mut s = session();
    s.eval("E = [];").unwrap();
    assert!(matches!(
        s.dimension_query("E"),
        Err(SessionError::NotFound { .. })
    ));
}

#[test]
fn test_auxiliary_variable_prefix() {
    let settings = engine_bridge::session::SessionSettingsBuilder::default()
        .scratch_prefix("aux_")
        .build()
        .unwrap();
    let mut s = Session::new(ReferenceEngine::new(), settings).unwrap();
    s.create_zero_sparse("Z", 2, 2).unwrap();
    s.extract_triplet_real::<usize, f64>("Z").unwrap();
    assert!(s
        .engine()
        .history()
        .iter()
        .any(|c| c == "clear aux_Z; [aux_Z(:, 1), aux_Z(:, 2), aux_Z(:, 3)] = find(Z);"));
    assert!(s.get("aux_Z").is_none());
}
