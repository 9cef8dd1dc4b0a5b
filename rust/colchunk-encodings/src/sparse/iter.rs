use std::{iter::FusedIterator, slice::ChunksExact};

use colchunk_common::{Result, error::Error};

use super::{
    SparseIntChunk,
    layout::HEADER_SIZE,
    width::{RowIdWidth, ValueWidth},
};

/// One stored record of a sparse chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseEntry {
    row: u32,
    raw: i64,
    value_width: ValueWidth,
}

impl SparseEntry {
    /// Chunk-relative row id.
    #[inline]
    pub fn row_in_chunk(&self) -> usize {
        self.row as usize
    }

    /// Stored value as read, sentinel included.
    #[inline]
    pub fn raw(&self) -> i64 {
        self.raw
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.value_width.is_sentinel(self.raw)
    }

    /// Fails with `MissingValue` if the entry is missing.
    pub fn as_integer(&self) -> Result<i64> {
        if self.is_missing() {
            Err(Error::missing_value(self.row_in_chunk()))
        } else {
            Ok(self.raw)
        }
    }

    /// `NaN` if the entry is missing.
    pub fn as_double(&self) -> f64 {
        if self.is_missing() {
            f64::NAN
        } else {
            self.raw as f64
        }
    }
}

/// Forward iterator over the stored records of a sparse chunk, in ascending row id
/// order.
#[derive(Clone)]
pub struct Entries<'a> {
    records: ChunksExact<'a, u8>,
    row_id_width: RowIdWidth,
    value_width: ValueWidth,
}

impl Iterator for Entries<'_> {
    type Item = SparseEntry;

    fn next(&mut self) -> Option<SparseEntry> {
        let record = self.records.next()?;
        let (id_field, value_field) = record.split_at(self.row_id_width.size());
        Some(SparseEntry {
            row: self.row_id_width.read(id_field),
            raw: self.value_width.read(value_field),
            value_width: self.value_width,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl FusedIterator for Entries<'_> {}

impl SparseIntChunk {
    /// Returns a fresh iterator over the stored records, starting at the first one.
    pub fn entries(&self) -> Entries<'_> {
        let layout = &self.layout;
        Entries {
            records: self.data[HEADER_SIZE..self.records_end()].chunks_exact(layout.record_size()),
            row_id_width: layout.row_id_width,
            value_width: layout.value_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        column::DecimalColumn,
        sparse::{SparseIntChunk, width::ValueWidth},
    };

    #[test]
    fn test_entries() {
        let mut column = DecimalColumn::new(20);
        column.push(1, 4, 0).unwrap();
        column.push_missing(7).unwrap();
        column.push(19, -3, 2).unwrap();
        let chunk = SparseIntChunk::encode_with_width(&column, ValueWidth::W2).unwrap();

        let entries = chunk.entries().collect::<Vec<_>>();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].row_in_chunk(), 1);
        assert_eq!(entries[0].as_integer().unwrap(), 4);
        assert!(entries[1].is_missing());
        assert!(entries[1].as_integer().unwrap_err().is_missing_value());
        assert!(entries[1].as_double().is_nan());
        assert_eq!(entries[2].row_in_chunk(), 19);
        assert_eq!(entries[2].as_double(), -300.0);

        // Each call starts over from the first record.
        let mut iter = chunk.entries();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
        assert_eq!(chunk.entries().next().unwrap().row_in_chunk(), 1);
    }

    #[test]
    fn test_entries_empty() {
        let chunk = SparseIntChunk::encode_with_width(&DecimalColumn::new(5), ValueWidth::W8)
            .unwrap();
        assert_eq!(chunk.entries().count(), 0);
    }
}
