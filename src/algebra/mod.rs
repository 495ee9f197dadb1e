//! Host-side numeric types and layout arithmetic.
//!
//! Everything in this module is pure: no engine calls are made here.

mod csc;
mod error_types;
mod floats;
mod layout;

pub use csc::*;
pub use error_types::*;
pub use floats::*;
pub use layout::*;

/// Complex double, the engine's complex cell type
pub type Complex64 = num_complex::Complex<f64>;
