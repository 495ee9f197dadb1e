//! __engine-bridge__ moves matrices between a host program and an external
//! computational engine that is driven through a synchronous
//! command/variable-exchange protocol, and orchestrates sparse linear
//! solves on that engine.
//!
//! The host sends named variables and command strings; the engine executes
//! them and exposes its results as named variables.  This crate takes care
//! of the parts of that exchange that are easy to get subtly wrong:
//!
//! * __Layout__: host buffers may be row-major or column-major while the
//!   engine is always column-major.  Every transfer takes an explicit
//!   [`Layout`](algebra::Layout), so nothing is ever silently transposed.
//!
//! * __Index shifting__: matrices of 0-based host indices are shifted to
//!   the engine's 1-based indexing on the way in and back on the way out.
//!
//! * __Sparse matrices__: sparse data is exchanged either as an `nnz x 3`
//!   triplet matrix converted by the engine itself, or directly in the
//!   engine's native compressed sparse column form.
//!
//! * __Linear solves__: [`Session::solve_sparse_linear_system`](session::Session::solve_sparse_linear_system)
//!   assembles `A` and `b` on the engine, left-divides and retrieves `x`,
//!   failing as a whole if any step fails.
//!
//! * __Scripts__: code text, script files and named scripts can be run with
//!   their console output captured.  The capture buffer is always
//!   released again, whichever way the call returns.
//!
//! # Engines
//!
//! The engine is anything implementing [`Engine`](engine::Engine).  The
//! crate ships `ReferenceEngine`, an in-process
//! engine understanding the command subset issued here, which is used by
//! the tests and demos.
//!
//! ```
//! # #[cfg(feature = "reference-engine")] {
//! use engine_bridge::engine::ReferenceEngine;
//! use engine_bridge::session::{Session, SessionSettings};
//!
//! let mut session = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
//! let mut x: [f64; 2] = [0.0; 2];
//! session
//!     .solve_sparse_linear_system(2, &[0usize, 1], &[0, 1], &[2.0, 3.0], &[4.0, 9.0], &mut x)
//!     .unwrap();
//! assert!((x[0] - 2.0).abs() < 1e-9);
//! # }
//! ```
//!
//! # Features
//!
//! * `serde` (default): serialization of settings, sparse matrices and
//!   [`LinearSystem`](session::LinearSystem) snapshots as JSON.
//!
//! * `reference-engine` (default): the in-process `ReferenceEngine`.
//!   Builds driving a real engine can leave it out.
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

pub mod algebra;
pub mod codec;
pub mod engine;
pub mod io;
pub mod session;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// crate version as a string
pub fn version() -> &'static str {
    VERSION
}

#[test]
fn test_version() {
    assert_eq!(VERSION, version());
}
