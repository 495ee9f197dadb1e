#![cfg(feature = "reference-engine")]
#![allow(non_snake_case)]

use engine_bridge::{
    algebra::*,
    engine::ReferenceEngine,
    io::ConfigurablePrintTarget,
    session::{Session, SessionError, SessionSettings, SessionSettingsBuilder},
};

fn session() -> Session<ReferenceEngine> {
    let mut s = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
    s.print_to_sink();
    s
}

#[test]
fn test_diagonal_system() {
    let mut s = session();
    let mut x: [f64; 2] = [0.0; 2];
    s.solve_sparse_linear_system(2, &[0usize, 1], &[0, 1], &[2.0, 3.0], &[4.0, 9.0], &mut x)
        .unwrap();
    assert!((x[0] - 2.0).abs() < 1e-9);
    assert!((x[1] - 3.0).abs() < 1e-9);
}

#[test]
fn test_tridiagonal_system() {
    // -x_{i-1} + 2 x_i - x_{i+1} = b_i with x = 1..n
    let n = 8;
    let (mut rows, mut cols, mut vals) = (vec![], vec![], vec![]);
    for i in 0..n {
        rows.push(i);
        cols.push(i);
        vals.push(2.0);
        if i > 0 {
            rows.push(i);
            cols.push(i - 1);
            vals.push(-1.0);
        }
        if i + 1 < n {
            rows.push(i);
            cols.push(i + 1);
            vals.push(-1.0);
        }
    }
    let xtrue: Vec<f64> = (1..=n).map(|k| k as f64).collect();
    let mut b = vec![0.0; n];
    for (k, &r) in rows.iter().enumerate() {
        b[r] += vals[k] * xtrue[cols[k]];
    }

    let mut s = session();
    let mut x = vec![0.0; n];
    s.solve_sparse_linear_system(n, &rows, &cols, &vals, &b, &mut x)
        .unwrap();
    for (xi, ti) in x.iter().zip(xtrue.iter()) {
        assert!((xi - ti).abs() < 1e-9);
    }
}

#[test]
fn test_duplicate_entries_are_summed() {
    let mut s = session();
    let mut x = [0.0; 1];
    s.solve_sparse_linear_system(1, &[0u32, 0], &[0, 0], &[1.5, 0.5], &[3.0], &mut x)
        .unwrap();
    assert_eq!(x, [1.5]);
}

#[test]
fn test_singular_system_fails() {
    let mut s = session();
    let mut x = [0.0; 2];
    let res = s.solve_sparse_linear_system(
        2,
        &[0usize, 0, 1, 1],
        &[0, 1, 0, 1],
        &[1.0, 1.0, 1.0, 1.0],
        &[1.0, 2.0],
        &mut x,
    );
    assert!(matches!(res, Err(SessionError::SolveEngine { .. })));
    assert_eq!(x, [0.0, 0.0]);
}

#[test]
fn test_structurally_singular_system_fails() {
    // trailing row and column entirely empty
    let mut s = session();
    let mut x = [0.0; 3];
    let res = s.solve_sparse_linear_system(3, &[0usize, 1], &[0, 1], &[1.0, 1.0], &[1.0, 1.0, 1.0], &mut x);
    assert!(res.is_err());
}

#[test]
fn test_out_of_range_triplet_fails() {
    let mut s = session();
    let mut x = [0.0; 2];
    let res = s.solve_sparse_linear_system(2, &[0usize, 2], &[0, 1], &[1.0, 1.0], &[1.0, 1.0], &mut x);
    assert!(matches!(res, Err(SessionError::SolveEngine { .. })));
}

#[test]
fn test_unassembled_matrix_on_lenient_engine() {
    // the lenient engine reports the failed conversion as success, leaving
    // the nnz x 3 triplets under the matrix name
    let mut s = Session::new(ReferenceEngine::lenient(), SessionSettings::default()).unwrap();
    s.print_to_sink();

    // n = 3 = nnz: the triplets have the shape of the system matrix
    let mut x = [-1.0; 3];
    let res = s.solve_sparse_linear_system(
        3,
        &[0usize, 1, 5],
        &[0, 1, 2],
        &[1.0, 1.0, 1.0],
        &[1.0, 2.0, 3.0],
        &mut x,
    );
    match res {
        Err(SessionError::SolveEngine { reason, .. }) => {
            assert_eq!(reason, "system matrix was not assembled")
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(x, [-1.0; 3]);
    assert!(s.last_solve().lhs.is_none());

    // n = 2: the triplets do not
    let mut x = [-1.0; 2];
    let res = s.solve_sparse_linear_system(2, &[0usize, 5], &[0, 1], &[1.0, 1.0], &[1.0, 1.0], &mut x);
    assert!(matches!(res, Err(SessionError::SolveEngine { .. })));
    assert_eq!(x, [-1.0; 2]);

    // the same session still solves a well-formed system
    s.solve_sparse_linear_system(2, &[0usize, 1], &[0, 1], &[2.0, 4.0], &[1.0, 1.0], &mut x)
        .unwrap();
    assert_eq!(x, [0.5, 0.25]);
}

#[test]
fn test_repeated_solves() {
    let mut s = session();
    let mut x = [0.0; 2];
    for k in 1..=5 {
        let d = k as f64;
        s.solve_sparse_linear_system(2, &[0usize, 1], &[0, 1], &[d, d], &[d, 2.0 * d], &mut x)
            .unwrap();
        assert_eq!(x, [1.0, 2.0]);
    }
    // only the operands of the last solve are live on the engine
    let names: Vec<_> = s
        .engine()
        .variable_names()
        .into_iter()
        .filter(|n| n.starts_with("LS_"))
        .collect();
    assert_eq!(names, ["LS_A", "LS_b", "LS_x"]);
}

#[test]
fn test_failed_solve_then_success() {
    let mut s = session();
    let mut x = [0.0; 2];
    assert!(s
        .solve_sparse_linear_system(2, &[0usize], &[0], &[1.0], &[1.0, 1.0], &mut x)
        .is_err());
    s.solve_sparse_linear_system(2, &[0usize, 1], &[0, 1], &[1.0, 4.0], &[1.0, 1.0], &mut x)
        .unwrap();
    assert_eq!(x, [1.0, 0.25]);
}

#[test]
fn test_custom_prefix() {
    let settings = SessionSettingsBuilder::default()
        .solve_prefix("SYS")
        .verbose(false)
        .build()
        .unwrap();
    let mut s = Session::new(ReferenceEngine::new(), settings).unwrap();
    s.eval("LS_A = 1;").unwrap();
    let mut x = [0.0; 1];
    s.solve_sparse_linear_system(1, &[0usize], &[0], &[2.0], &[1.0], &mut x)
        .unwrap();
    assert_eq!(x, [0.5]);
    assert!(s.get("SYS_x").is_some());
    // other prefixes are left alone
    assert!(s.get("LS_A").is_some());
}

#[test]
fn test_closed_engine_fails() {
    let mut s = session();
    s.close();
    let mut x = [0.0; 1];
    let res = s.solve_sparse_linear_system(1, &[0usize], &[0], &[2.0], &[1.0], &mut x);
    assert!(res.is_err());
    s.restart().unwrap();
    s.solve_sparse_linear_system(1, &[0usize], &[0], &[2.0], &[1.0], &mut x)
        .unwrap();
    assert_eq!(x, [0.5]);
}

#[test]
fn test_solve_against_host_product() {
    let A = CscMatrix::new_from_triplets(
        3,
        3,
        &[0, 1, 2, 0, 2],
        &[0, 1, 2, 2, 0],
        &[4.0, 5.0, 6.0, 1.0, 1.0],
    )
    .unwrap();
    let (rows, cols, vals) = A.findnz();
    let b = [1.0, 2.0, 3.0];

    let mut s = session();
    let mut x = [0.0; 3];
    s.solve_sparse_linear_system(3, &rows, &cols, &vals, &b, &mut x)
        .unwrap();

    // residual A x - b computed on the host
    let mut r = [0.0; 3];
    for (k, (&i, &j)) in rows.iter().zip(cols.iter()).enumerate() {
        r[i] += vals[k] * x[j];
    }
    for i in 0..3 {
        assert!((r[i] - b[i]).abs() < 1e-12);
    }
}
