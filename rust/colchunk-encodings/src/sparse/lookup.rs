//! Row id resolution: a single-slot access cache backed by binary search.

use std::sync::atomic::{AtomicUsize, Ordering};

use colchunk_common::{Result, error::Error};

use super::{SparseIntChunk, layout::HEADER_SIZE};

/// Byte offset of the most recently resolved record.
///
/// Only a hint: readers on different threads may overwrite each other's value,
/// and every loaded offset is re-validated against the record geometry, so a
/// stale or foreign value can only turn into a cache miss.
#[derive(Debug)]
pub(crate) struct AccessCache(AtomicUsize);

impl AccessCache {
    pub fn new() -> AccessCache {
        AccessCache(AtomicUsize::new(HEADER_SIZE))
    }

    /// Returns the cached offset if it points at a record boundary before `end`,
    /// otherwise the first record.
    #[inline]
    pub fn get(&self, end: usize, record_size: usize) -> usize {
        let offset = self.0.load(Ordering::Relaxed);
        if offset >= HEADER_SIZE && offset < end && (offset - HEADER_SIZE) % record_size == 0 {
            offset
        } else {
            HEADER_SIZE
        }
    }

    #[inline]
    pub fn set(&self, offset: usize) {
        self.0.store(offset, Ordering::Relaxed);
    }
}

#[cold]
fn truncated_record(offset: usize) -> Error {
    Error::invalid_format("sparse record", format!("truncated at offset {offset}"))
}

impl SparseIntChunk {
    /// Row id of the record at byte `offset`.
    #[inline]
    pub(crate) fn row_id_at(&self, offset: usize) -> Result<usize> {
        let width = self.layout.row_id_width;
        self.data
            .get(offset..offset + width.size())
            .map(|field| width.read(field) as usize)
            .ok_or_else(|| truncated_record(offset))
    }

    /// Raw (sign-extended) value of the record at byte `offset`.
    #[inline]
    pub(crate) fn raw_value_at(&self, offset: usize) -> Result<i64> {
        let start = offset + self.layout.row_id_width.size();
        let width = self.layout.value_width;
        self.data
            .get(start..start + width.size())
            .map(|field| width.read(field))
            .ok_or_else(|| truncated_record(offset))
    }

    /// Byte offset of the record storing row `idx`, or `None` if the row is an
    /// implicit zero.
    pub(crate) fn find_offset(&self, idx: usize) -> Result<Option<usize>> {
        self.check_index(idx)?;
        if self.sparse_len() == 0 {
            return Ok(None);
        }
        let offset = self.find_floor_offset(idx)?;
        if self.row_id_at(offset)? == idx {
            Ok(Some(offset))
        } else {
            Ok(None)
        }
    }

    /// Byte offset of the record with the greatest row id not above `idx`, or of
    /// the first record if every stored row id is above `idx`. The chunk must hold
    /// at least one record.
    ///
    /// Consults the access cache first: a hit on the cached record, or on the
    /// record right after it, avoids the search.
    pub(crate) fn find_floor_offset(&self, idx: usize) -> Result<usize> {
        let count = self.sparse_len();
        let record_size = self.layout.record_size();
        let end = self.records_end();

        let offset = self.last_offset.get(end, record_size);
        let cached_id = self.row_id_at(offset)?;
        if idx == cached_id {
            return Ok(offset);
        }
        if idx > cached_id {
            let next_offset = offset + record_size;
            if next_offset < end {
                let next_id = self.row_id_at(next_offset)?;
                if idx < next_id {
                    return Ok(offset);
                }
                if idx == next_id {
                    self.last_offset.set(next_offset);
                    return Ok(next_offset);
                }
            }
        }

        log::trace!("sparse lookup of row {idx} missed the access cache");
        let mut lo = 0;
        let mut hi = count;
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            if idx < self.row_id_at(self.layout.entry_offset(mid))? {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        let offset = self.layout.entry_offset(lo);
        self.last_offset.set(offset);
        Ok(offset)
    }

    /// Number of rows from `row` to the next stored row after it; `0` when no
    /// stored row follows.
    pub fn skip_count(&self, row: usize) -> Result<usize> {
        self.check_index(row)?;
        if self.sparse_len() == 0 {
            return Ok(0);
        }
        let offset = self.find_floor_offset(row)?;
        let floor_id = self.row_id_at(offset)?;
        if floor_id > row {
            return Ok(floor_id - row);
        }
        let next_offset = offset + self.layout.record_size();
        if next_offset < self.records_end() {
            Ok(self.row_id_at(next_offset)?.saturating_sub(row))
        } else {
            Ok(0)
        }
    }
}
