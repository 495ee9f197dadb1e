#![allow(non_snake_case)]

use engine_bridge::engine::ReferenceEngine;
use engine_bridge::session::*;

fn problem_data() -> (usize, Vec<usize>, Vec<usize>, Vec<f64>, Vec<f64>) {
    // 1-D Poisson matrix, tridiagonal [-1 2 -1]
    let n = 6;
    let mut rows = vec![];
    let mut cols = vec![];
    let mut vals = vec![];
    for i in 0..n {
        rows.push(i);
        cols.push(i);
        vals.push(2.);
        if i + 1 < n {
            rows.extend([i, i + 1]);
            cols.extend([i + 1, i]);
            vals.extend([-1., -1.]);
        }
    }
    let b = vec![1.; n];

    (n, rows, cols, vals, b)
}

fn main() {
    let (n, rows, cols, vals, b) = problem_data();

    let settings = SessionSettingsBuilder::default()
        .solve_prefix("LS")
        .build()
        .unwrap();

    let mut session = match Session::new(ReferenceEngine::new(), settings) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut x = vec![0.; n];
    match session.solve_sparse_linear_system(n, &rows, &cols, &vals, &b, &mut x) {
        Ok(()) => println!("x = {:?}", x),
        Err(e) => println!("solve failed with error code {}: {}", e.code(), e),
    }

    // a singular system fails as a whole
    let mut y = vec![0.; 2];
    let res = session.solve_sparse_linear_system(2, &[0, 0, 1, 1], &[0, 1, 0, 1], &[1., 1., 1., 1.], &[1., 2.], &mut y);
    println!("singular system: {:?}", res.map(|_| y));
}
