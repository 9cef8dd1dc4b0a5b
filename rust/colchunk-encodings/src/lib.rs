//! Column chunk encodings.
//!
//! The central type is [`sparse::SparseIntChunk`], a write-once byte layout for
//! mostly-zero integer and quantized-decimal column fragments. It records only the
//! non-zero (or missing) rows together with their chunk-relative row ids, and
//! resolves any single row in logarithmic time.

pub mod chunk;
pub mod column;
pub mod decimal;
pub mod sparse;

pub use chunk::Chunk;
pub use column::DecimalColumn;
pub use sparse::{SparseEncodingConfig, SparseIntChunk};
