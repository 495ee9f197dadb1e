//! The protocol seam to the external computational engine.
//!
//! Everything the rest of the crate knows about an engine goes through the
//! [`Engine`] trait: put a named variable, get a named variable, evaluate a
//! command, and capture console output while doing so.  Values cross the
//! seam as owned [`EngineArray`]s.

mod array;
mod capture;
#[cfg(feature = "reference-engine")]
pub mod reference;
mod traits;

pub use array::*;
pub use capture::*;
#[cfg(feature = "reference-engine")]
pub use reference::ReferenceEngine;
pub use traits::*;

/// Longest identifier the engine accepts.
pub const MAX_NAME_LEN: usize = 63;

/// Whether `name` is a valid engine identifier: a letter followed by
/// letters, digits or underscores, at most [`MAX_NAME_LEN`] characters.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name.len() <= MAX_NAME_LEN && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
