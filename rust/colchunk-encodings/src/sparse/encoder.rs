use colchunk_common::{Result, error::Error, verify_arg};

use super::{layout::SparseLayout, width::ValueWidth};
use crate::decimal::{MISSING_EXPONENT, quantize};

/// Packs the stored entries into a new buffer laid out per `layout`.
///
/// Entries must arrive in strictly ascending row id order, every row id below
/// `layout.logical_len`; they are not sorted here. A value equal to
/// [`MISSING_EXPONENT`] in `exponents` stores the missing-value sentinel, any
/// other exponent must be in `0..=MAX_EXPONENT`. Quantized values are truncated
/// to the value width. A presence-only layout accepts no value other than `1`.
///
/// [`MAX_EXPONENT`]: crate::decimal::MAX_EXPONENT
pub(crate) fn encode_entries(
    layout: &SparseLayout,
    row_ids: &[u32],
    mantissas: &[i64],
    exponents: &[i32],
) -> Result<Vec<u8>> {
    verify_arg!(mantissas, mantissas.len() == row_ids.len());
    verify_arg!(exponents, exponents.len() == row_ids.len());

    let row_id_width = layout.row_id_width;
    let value_width = layout.value_width;
    let mut buf = layout.allocate(row_ids.len());

    let mut prev_row: Option<u32> = None;
    let records = buf[layout.entry_offset(0)..].chunks_exact_mut(layout.record_size());
    for (i, record) in records.enumerate() {
        let row = row_ids[i];
        if row as usize >= layout.logical_len {
            return Err(Error::index_out_of_range(row as usize, layout.logical_len));
        }
        if prev_row.is_some_and(|prev| prev >= row) {
            return Err(Error::invalid_arg(
                "row_ids",
                format!("row id {row} at entry {i} is not strictly ascending"),
            ));
        }
        prev_row = Some(row);

        let (id_field, value_field) = record.split_at_mut(row_id_width.size());
        row_id_width.write(id_field, row);

        let exponent = exponents[i];
        if exponent == MISSING_EXPONENT {
            value_width.write_sentinel(value_field)?;
        } else {
            let value = quantize(mantissas[i], exponent)?;
            if value_width == ValueWidth::W0 && value != 1 {
                return Err(Error::invalid_arg(
                    "mantissas",
                    format!("value {value} at entry {i} needs a payload width"),
                ));
            }
            value_width.write(value_field, value);
        }
    }

    log::debug!(
        "encoded sparse chunk: len={}, entries={}, row_id_width={}, value_width={}",
        layout.logical_len,
        row_ids.len(),
        row_id_width.size(),
        value_width.size()
    );
    Ok(buf)
}
