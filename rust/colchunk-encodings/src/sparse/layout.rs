//! Header format and field-width planning of the sparse layout.
//!
//! ```text
//! offset  size            field
//! 0       4               logical_len (u32, little-endian)
//! 4       1               row_id_width (2 or 4)
//! 5       1               value_width (0, 1, 2, 4 or 8)
//! 6       row_id_width    row id of entry 0
//! ..      value_width     value of entry 0 (absent if value_width = 0)
//! ...                     one record per stored entry, ascending row id
//! ```

use byteorder::{ByteOrder, LE};
use colchunk_common::{Result, error::Error, verify_arg, verify_data};

use super::width::{RowIdWidth, ValueWidth};
use crate::column::DecimalColumn;

/// Size of the fixed header preceding the records.
pub const HEADER_SIZE: usize = 6;

/// Constraints applied when the value width is chosen from the data.
#[derive(Debug, Clone)]
pub struct SparseEncodingConfig {
    /// Whether a column whose stored values are all `1` (and none missing) may be
    /// encoded without value payloads.
    pub allow_presence_only: bool,

    /// Narrowest payload width the planner may choose.
    pub min_value_width: ValueWidth,
}

impl SparseEncodingConfig {
    pub fn with_allow_presence_only(&self, allow: bool) -> Self {
        let mut config = self.clone();
        config.allow_presence_only = allow;
        config
    }

    pub fn with_min_value_width(&self, width: ValueWidth) -> Self {
        let mut config = self.clone();
        config.min_value_width = width;
        config
    }
}

impl Default for SparseEncodingConfig {
    fn default() -> Self {
        Self {
            allow_presence_only: true,
            min_value_width: ValueWidth::W1,
        }
    }
}

/// Field geometry of one sparse chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseLayout {
    pub logical_len: usize,
    pub row_id_width: RowIdWidth,
    pub value_width: ValueWidth,
}

impl SparseLayout {
    /// Creates the layout of a chunk with `logical_len` rows storing values of
    /// `value_width` bytes. The row id width follows from the length.
    pub fn new(logical_len: usize, value_width: ValueWidth) -> Result<SparseLayout> {
        verify_arg!(logical_len, u32::try_from(logical_len).is_ok());
        Ok(SparseLayout {
            logical_len,
            row_id_width: RowIdWidth::for_len(logical_len),
            value_width,
        })
    }

    /// Plans the layout for `column`, choosing the narrowest value width that
    /// holds every stored value while keeping the sentinel pattern reserved.
    pub fn plan(column: &DecimalColumn, config: &SparseEncodingConfig) -> Result<SparseLayout> {
        let mut min = i64::MAX;
        let mut max = i64::MIN;
        let mut has_missing = false;
        for i in 0..column.entry_count() {
            match column.entry_value(i)? {
                Some(value) => {
                    min = min.min(value);
                    max = max.max(value);
                }
                None => has_missing = true,
            }
        }

        let presence_only = config.allow_presence_only && !has_missing && min >= 1 && max <= 1;
        let value_width = if presence_only {
            ValueWidth::W0
        } else if min > max {
            // Nothing but missing entries.
            config.min_value_width.max(ValueWidth::W1)
        } else {
            ValueWidth::smallest_for(min, max)
                .max(config.min_value_width)
                .max(ValueWidth::W1)
        };
        Self::new(column.len(), value_width)
    }

    /// Size of one stored record.
    #[inline]
    pub fn record_size(&self) -> usize {
        self.row_id_width.size() + self.value_width.size()
    }

    /// Total buffer size holding `entry_count` records.
    #[inline]
    pub fn buffer_size(&self, entry_count: usize) -> usize {
        HEADER_SIZE + entry_count * self.record_size()
    }

    /// Number of whole records held by a buffer of `buffer_len` bytes.
    #[inline]
    pub fn entry_count(&self, buffer_len: usize) -> usize {
        buffer_len.saturating_sub(HEADER_SIZE) / self.record_size()
    }

    /// Byte offset of the `n`-th record.
    #[inline]
    pub fn entry_offset(&self, n: usize) -> usize {
        HEADER_SIZE + n * self.record_size()
    }

    /// Allocates a zeroed buffer for `entry_count` records with the header filled in.
    pub fn allocate(&self, entry_count: usize) -> Vec<u8> {
        let mut buf = vec![0u8; self.buffer_size(entry_count)];
        self.write_header(&mut buf);
        buf
    }

    pub fn write_header(&self, buf: &mut [u8]) {
        LE::write_u32(&mut buf[0..4], self.logical_len as u32);
        buf[4] = self.row_id_width as u8;
        buf[5] = self.value_width as u8;
    }

    /// Decodes the header of a serialized chunk.
    pub fn read_header(buf: &[u8]) -> Result<SparseLayout> {
        verify_data!(sparse_header, buf.len() >= HEADER_SIZE);
        let logical_len = LE::read_u32(&buf[0..4]) as usize;
        let row_id_width = RowIdWidth::try_from(buf[4])?;
        let value_width = ValueWidth::try_from(buf[5]).map_err(|_| {
            Error::invalid_format("sparse header", format!("value width {}", buf[5]))
        })?;
        Ok(SparseLayout {
            logical_len,
            row_id_width,
            value_width,
        })
    }
}
