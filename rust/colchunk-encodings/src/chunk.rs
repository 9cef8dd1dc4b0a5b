use colchunk_common::Result;

use crate::column::DecimalColumn;

/// Row-level access to a fixed-length fragment of one column.
///
/// Row indices are chunk-relative and must be below [`len`](Chunk::len); any other
/// index fails with `IndexOutOfRange`.
pub trait Chunk: Send + Sync {
    /// Number of logical rows, including implicit zeros.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer value at `idx`. Fails with `MissingValue` if the row is missing.
    fn at_integer(&self, idx: usize) -> Result<i64>;

    /// Floating-point value at `idx`, `NaN` if the row is missing.
    fn at_double(&self, idx: usize) -> Result<f64>;

    fn is_na(&self, idx: usize) -> Result<bool>;

    fn set_integer(&mut self, idx: usize, value: i64) -> Result<()>;

    fn set_double(&mut self, idx: usize, value: f64) -> Result<()>;

    fn set_na(&mut self, idx: usize) -> Result<()>;

    /// Returns `true` if the chunk stores only a subset of its rows explicitly.
    fn is_sparse(&self) -> bool {
        false
    }

    /// Number of explicitly stored rows.
    fn sparse_len(&self) -> usize {
        self.len()
    }

    /// Writes the chunk-relative ids of the stored rows into `out`, in ascending
    /// order, and returns their count. Fails with `DestBufferTooSmall` if `out`
    /// holds fewer than [`sparse_len`](Chunk::sparse_len) elements.
    fn non_zero_row_ids(&self, out: &mut [u32]) -> Result<usize>;

    /// Returns `true` if the chunk may hold non-integral values.
    fn has_float(&self) -> bool;

    /// Re-expands the chunk into its (row id, mantissa, exponent) form.
    fn inflate(&self) -> Result<DecimalColumn>;
}
