//! Sparse integer chunk: a write-once byte layout storing only the non-zero and
//! missing rows of a column fragment, each as a (row id, value) record sorted by
//! row id.
//!
//! See [`layout`] for the byte format and [`width`] for the field widths and the
//! missing-value sentinels.

use colchunk_common::{
    Result,
    error::{Error, ErrorKind},
};

use crate::{chunk::Chunk, column::DecimalColumn};

mod encoder;
mod iter;
pub mod layout;
mod lookup;
mod serialization;
pub mod width;

pub use iter::{Entries, SparseEntry};
pub use layout::{HEADER_SIZE, SparseEncodingConfig, SparseLayout};
pub use width::{RowIdWidth, ValueWidth};

use lookup::AccessCache;

/// An immutable sparse chunk of integer (or quantized-decimal) values.
///
/// Rows without a record are zero. A record whose value equals the sentinel of the
/// chunk's value width is missing. Row lookups resolve through a single-slot cache
/// of the last resolved record, falling back to binary search; sequential scans
/// mostly hit the cache.
///
/// All mutation is rejected with `Unsupported`.
#[derive(Debug)]
pub struct SparseIntChunk {
    layout: SparseLayout,
    data: Vec<u8>,
    last_offset: AccessCache,
}

impl SparseIntChunk {
    /// Encodes `column`, choosing the value width from its values.
    pub fn encode(
        column: &DecimalColumn,
        config: &SparseEncodingConfig,
    ) -> Result<SparseIntChunk> {
        let layout = SparseLayout::plan(column, config)?;
        Self::encode_with_layout(column, layout)
    }

    /// Encodes `column` with an explicit value width. Values that do not fit are
    /// truncated to the width.
    pub fn encode_with_width(
        column: &DecimalColumn,
        value_width: ValueWidth,
    ) -> Result<SparseIntChunk> {
        let layout = SparseLayout::new(column.len(), value_width)?;
        Self::encode_with_layout(column, layout)
    }

    /// Encodes stored entries given as parallel slices. `row_ids` must be strictly
    /// ascending; an exponent equal to [`MISSING_EXPONENT`] marks a missing entry.
    ///
    /// [`MISSING_EXPONENT`]: crate::decimal::MISSING_EXPONENT
    pub fn encode_entries(
        logical_len: usize,
        row_ids: &[u32],
        mantissas: &[i64],
        exponents: &[i32],
        value_width: ValueWidth,
    ) -> Result<SparseIntChunk> {
        let layout = SparseLayout::new(logical_len, value_width)?;
        let data = encoder::encode_entries(&layout, row_ids, mantissas, exponents)?;
        Ok(Self::from_parts(layout, data))
    }

    fn encode_with_layout(
        column: &DecimalColumn,
        layout: SparseLayout,
    ) -> Result<SparseIntChunk> {
        let data = encoder::encode_entries(
            &layout,
            column.row_ids(),
            column.mantissas(),
            column.exponents(),
        )?;
        Ok(Self::from_parts(layout, data))
    }

    fn from_parts(layout: SparseLayout, data: Vec<u8>) -> SparseIntChunk {
        SparseIntChunk {
            layout,
            data,
            last_offset: AccessCache::new(),
        }
    }

    /// Number of logical rows, including implicit zeros.
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.logical_len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn layout(&self) -> &SparseLayout {
        &self.layout
    }

    #[inline]
    pub fn row_id_width(&self) -> RowIdWidth {
        self.layout.row_id_width
    }

    #[inline]
    pub fn value_width(&self) -> ValueWidth {
        self.layout.value_width
    }

    /// Number of stored records.
    #[inline]
    pub fn sparse_len(&self) -> usize {
        self.layout.entry_count(self.data.len())
    }

    /// Integer value at row `idx`; `0` for rows without a record.
    pub fn integer_value(&self, idx: usize) -> Result<i64> {
        match self.find_offset(idx)? {
            Some(offset) => {
                let raw = self.raw_value_at(offset)?;
                if self.layout.value_width.is_sentinel(raw) {
                    Err(Error::missing_value(idx))
                } else {
                    Ok(raw)
                }
            }
            None => Ok(0),
        }
    }

    /// Value at row `idx` as `f64`; `NaN` for missing rows, `0.0` for rows
    /// without a record.
    pub fn double_value(&self, idx: usize) -> Result<f64> {
        match self.find_offset(idx)? {
            Some(offset) => {
                let raw = self.raw_value_at(offset)?;
                if self.layout.value_width.is_sentinel(raw) {
                    Ok(f64::NAN)
                } else {
                    Ok(raw as f64)
                }
            }
            None => Ok(0.0),
        }
    }

    /// Returns `true` if row `idx` has a record holding the missing-value sentinel.
    pub fn is_missing(&self, idx: usize) -> Result<bool> {
        match self.find_offset(idx)? {
            Some(offset) => Ok(self
                .layout
                .value_width
                .is_sentinel(self.raw_value_at(offset)?)),
            None => Ok(false),
        }
    }

    #[inline]
    fn check_index(&self, idx: usize) -> Result<()> {
        if idx < self.len() {
            Ok(())
        } else {
            Err(Error::index_out_of_range(idx, self.len()))
        }
    }

    /// End of the last whole record.
    #[inline]
    fn records_end(&self) -> usize {
        self.layout.entry_offset(self.sparse_len())
    }
}

impl Clone for SparseIntChunk {
    fn clone(&self) -> Self {
        Self::from_parts(self.layout, self.data.clone())
    }
}

impl Chunk for SparseIntChunk {
    fn len(&self) -> usize {
        SparseIntChunk::len(self)
    }

    fn at_integer(&self, idx: usize) -> Result<i64> {
        self.integer_value(idx)
    }

    fn at_double(&self, idx: usize) -> Result<f64> {
        self.double_value(idx)
    }

    fn is_na(&self, idx: usize) -> Result<bool> {
        self.is_missing(idx)
    }

    fn set_integer(&mut self, _idx: usize, _value: i64) -> Result<()> {
        Err(Error::unsupported("set_integer on sparse chunk"))
    }

    fn set_double(&mut self, _idx: usize, _value: f64) -> Result<()> {
        Err(Error::unsupported("set_double on sparse chunk"))
    }

    fn set_na(&mut self, _idx: usize) -> Result<()> {
        Err(Error::unsupported("set_na on sparse chunk"))
    }

    fn is_sparse(&self) -> bool {
        true
    }

    fn sparse_len(&self) -> usize {
        SparseIntChunk::sparse_len(self)
    }

    fn non_zero_row_ids(&self, out: &mut [u32]) -> Result<usize> {
        let count = self.sparse_len();
        if out.len() < count {
            return Err(ErrorKind::DestBufferTooSmall.into());
        }
        for (slot, entry) in out.iter_mut().zip(self.entries()) {
            *slot = entry.row_in_chunk() as u32;
        }
        Ok(count)
    }

    fn has_float(&self) -> bool {
        false
    }

    fn inflate(&self) -> Result<DecimalColumn> {
        let mut column = DecimalColumn::with_capacity(self.len(), self.sparse_len());
        for entry in self.entries() {
            if entry.is_missing() {
                column.push_missing(entry.row_in_chunk())?;
            } else {
                column.push_value(entry.row_in_chunk(), entry.raw())?;
            }
        }
        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use colchunk_common::error::ErrorKind;

    use super::{SparseEncodingConfig, SparseIntChunk, ValueWidth};
    use crate::{chunk::Chunk, column::DecimalColumn};

    fn scenario_column() -> DecimalColumn {
        let mut column = DecimalColumn::new(10);
        column.push(2, 3, 0).unwrap();
        column.push_missing(5).unwrap();
        column.push(9, 7, 1).unwrap();
        column
    }

    #[test]
    fn test_scenario() {
        let chunk =
            SparseIntChunk::encode(&scenario_column(), &SparseEncodingConfig::default()).unwrap();
        assert_eq!(chunk.len(), 10);
        assert_eq!(chunk.value_width(), ValueWidth::W1);
        assert_eq!(chunk.integer_value(2).unwrap(), 3);
        assert!(chunk.is_missing(5).unwrap());
        assert_eq!(chunk.integer_value(9).unwrap(), 70);
        assert_eq!(chunk.integer_value(0).unwrap(), 0);
        assert_eq!(chunk.sparse_len(), 3);

        assert!(chunk.double_value(5).unwrap().is_nan());
        assert_eq!(chunk.double_value(9).unwrap(), 70.0);
        assert_eq!(chunk.double_value(1).unwrap(), 0.0);
        assert!(!chunk.is_missing(2).unwrap());
        assert!(!chunk.is_missing(3).unwrap());
    }

    #[test]
    fn test_missing_value_integer_access() {
        let chunk = SparseIntChunk::encode_with_width(&scenario_column(), ValueWidth::W8).unwrap();
        let err = chunk.integer_value(5).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingValue { index: 5 }));
    }

    #[test]
    fn test_out_of_range() {
        let chunk = SparseIntChunk::encode_with_width(&scenario_column(), ValueWidth::W2).unwrap();
        for result in [
            chunk.integer_value(10).map(|_| ()),
            chunk.double_value(10).map(|_| ()),
            chunk.is_missing(11).map(|_| ()),
        ] {
            assert!(matches!(
                result.unwrap_err().kind(),
                ErrorKind::IndexOutOfRange { len: 10, .. }
            ));
        }
    }

    #[test]
    fn test_mutation_rejected() {
        let mut chunk =
            SparseIntChunk::encode_with_width(&scenario_column(), ValueWidth::W4).unwrap();
        let before = chunk.as_bytes().to_vec();
        assert!(chunk.set_integer(0, 5).unwrap_err().is_unsupported());
        assert!(chunk.set_double(2, 1.5).unwrap_err().is_unsupported());
        assert!(chunk.set_na(9).unwrap_err().is_unsupported());
        assert_eq!(chunk.as_bytes(), before.as_slice());
        assert_eq!(chunk.integer_value(2).unwrap(), 3);
    }

    #[test]
    fn test_presence_only() {
        let column = DecimalColumn::from_dense(&[Some(0), Some(1), Some(1), Some(0)]).unwrap();
        let chunk = SparseIntChunk::encode(&column, &SparseEncodingConfig::default()).unwrap();
        assert_eq!(chunk.value_width(), ValueWidth::W0);
        assert_eq!(chunk.as_bytes().len(), 6 + 2 * 2);
        assert_eq!(chunk.integer_value(1).unwrap(), 1);
        assert_eq!(chunk.integer_value(0).unwrap(), 0);
        assert_eq!(chunk.double_value(2).unwrap(), 1.0);
        assert!(!chunk.is_missing(2).unwrap());

        let mut column = DecimalColumn::new(8);
        column.push_value(2, 1).unwrap();
        column.push_value(5, 4).unwrap();
        assert!(matches!(
            SparseIntChunk::encode_with_width(&column, ValueWidth::W0)
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_chunk_interface() {
        let chunk = SparseIntChunk::encode_with_width(&scenario_column(), ValueWidth::W2).unwrap();
        let chunk: &dyn Chunk = &chunk;
        assert!(chunk.is_sparse());
        assert!(!chunk.has_float());
        assert_eq!(chunk.sparse_len(), 3);
        assert_eq!(chunk.at_integer(9).unwrap(), 70);
        assert!(chunk.is_na(5).unwrap());

        let mut rows = [0u32; 4];
        assert_eq!(chunk.non_zero_row_ids(&mut rows).unwrap(), 3);
        assert_eq!(&rows[..3], &[2, 5, 9]);
        let mut short = [0u32; 2];
        assert!(matches!(
            chunk.non_zero_row_ids(&mut short).unwrap_err().kind(),
            ErrorKind::DestBufferTooSmall
        ));
    }

    #[test]
    fn test_inflate() {
        let chunk = SparseIntChunk::encode_with_width(&scenario_column(), ValueWidth::W4).unwrap();
        let inflated = chunk.inflate().unwrap();
        assert_eq!(inflated.len(), 10);
        assert_eq!(inflated.row_ids(), &[2, 5, 9]);
        assert_eq!(
            inflated.to_dense().unwrap(),
            scenario_column().to_dense().unwrap()
        );
    }

    #[test]
    fn test_wide_row_ids() {
        let mut column = DecimalColumn::new(100_000);
        column.push_value(0, -5).unwrap();
        column.push_value(65_535, 12).unwrap();
        column.push_value(99_999, 1 << 40).unwrap();
        let chunk = SparseIntChunk::encode(&column, &SparseEncodingConfig::default()).unwrap();
        assert_eq!(chunk.row_id_width().size(), 4);
        assert_eq!(chunk.value_width(), ValueWidth::W8);
        assert_eq!(chunk.integer_value(65_535).unwrap(), 12);
        assert_eq!(chunk.integer_value(99_999).unwrap(), 1 << 40);
        assert_eq!(chunk.integer_value(0).unwrap(), -5);
        assert_eq!(chunk.integer_value(65_534).unwrap(), 0);

        let mut rows = vec![0u32; 3];
        chunk.non_zero_row_ids(&mut rows).unwrap();
        assert_eq!(rows, vec![0, 65_535, 99_999]);
    }

    #[test]
    fn test_clone_is_independent() {
        let chunk = SparseIntChunk::encode_with_width(&scenario_column(), ValueWidth::W2).unwrap();
        assert_eq!(chunk.integer_value(9).unwrap(), 70);
        let copy = chunk.clone();
        assert_eq!(copy.as_bytes(), chunk.as_bytes());
        assert_eq!(copy.integer_value(2).unwrap(), 3);
        assert_eq!(chunk.integer_value(9).unwrap(), 70);
    }
}
