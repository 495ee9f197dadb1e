//! The Session Channel and everything built on it.
//!
//! A [`Session`] owns the connection to one engine.  On top of its four
//! primitives it provides typed matrix transfers, sparse assembly and
//! extraction, the sparse linear solve and the script runner.

mod channel;
mod error;
mod script;
mod settings;
mod shape;
mod solve;
mod sparse;

#[cfg(feature = "serde")]
mod json;

pub use channel::*;
pub use error::*;
pub use script::normalize_output;
pub use settings::*;
pub use shape::*;
pub use solve::*;
pub use sparse::parse_size_output;

#[cfg(feature = "serde")]
pub use json::*;
