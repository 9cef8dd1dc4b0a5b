//! Core definitions (error type, result alias and validation macros), relied upon
//! by all colchunk-* crates.

pub mod error;
pub mod result;

pub use result::Result;
