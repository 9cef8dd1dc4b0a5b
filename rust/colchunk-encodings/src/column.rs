//! `DecimalColumn`: the expanded (non-packed) side of a column fragment.
//!
//! Holds the explicitly stored rows of a chunk as parallel vectors of row ids,
//! mantissas and base-10 exponents. Rows not listed are zero. A row listed with
//! [`MISSING_EXPONENT`] is missing.

use colchunk_common::{Result, error::Error, verify_arg};

use crate::decimal::{MAX_EXPONENT, MISSING_EXPONENT, quantize};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecimalColumn {
    len: usize,
    row_ids: Vec<u32>,
    mantissas: Vec<i64>,
    exponents: Vec<i32>,
}

impl DecimalColumn {
    /// Creates an all-zero column of `len` logical rows.
    pub fn new(len: usize) -> DecimalColumn {
        DecimalColumn {
            len,
            ..Default::default()
        }
    }

    pub fn with_capacity(len: usize, capacity: usize) -> DecimalColumn {
        DecimalColumn {
            len,
            row_ids: Vec::with_capacity(capacity),
            mantissas: Vec::with_capacity(capacity),
            exponents: Vec::with_capacity(capacity),
        }
    }

    /// Builds a column from dense values, storing every non-zero and every
    /// missing (`None`) row.
    pub fn from_dense(values: &[Option<i64>]) -> Result<DecimalColumn> {
        let mut column = DecimalColumn::new(values.len());
        for (row, value) in values.iter().enumerate() {
            match *value {
                Some(0) => (),
                Some(v) => column.push_value(row, v)?,
                None => column.push_missing(row)?,
            }
        }
        Ok(column)
    }

    /// Appends a stored row `mantissa * 10^exponent`.
    ///
    /// Rows must be appended in strictly ascending order. `exponent` must be in
    /// `0..=MAX_EXPONENT`.
    pub fn push(&mut self, row: usize, mantissa: i64, exponent: i32) -> Result<()> {
        verify_arg!(exponent, (0..=MAX_EXPONENT).contains(&exponent));
        let row_id = self.next_row_id(row)?;
        self.append(row_id, mantissa, exponent);
        Ok(())
    }

    /// Appends a stored integer row.
    pub fn push_value(&mut self, row: usize, value: i64) -> Result<()> {
        self.push(row, value, 0)
    }

    /// Appends a missing row.
    pub fn push_missing(&mut self, row: usize) -> Result<()> {
        let row_id = self.next_row_id(row)?;
        self.append(row_id, 0, MISSING_EXPONENT);
        Ok(())
    }

    /// Number of logical rows, including implicit zeros.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of explicitly stored rows.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.row_ids.len()
    }

    #[inline]
    pub fn row_ids(&self) -> &[u32] {
        &self.row_ids
    }

    #[inline]
    pub fn mantissas(&self) -> &[i64] {
        &self.mantissas
    }

    #[inline]
    pub fn exponents(&self) -> &[i32] {
        &self.exponents
    }

    /// Returns `true` if the `i`-th stored entry is missing.
    pub fn is_missing_entry(&self, i: usize) -> Result<bool> {
        self.exponents
            .get(i)
            .map(|&exponent| exponent == MISSING_EXPONENT)
            .ok_or_else(|| Error::index_out_of_range(i, self.entry_count()))
    }

    /// Value of the `i`-th stored entry, `None` if missing.
    pub fn entry_value(&self, i: usize) -> Result<Option<i64>> {
        if self.is_missing_entry(i)? {
            Ok(None)
        } else {
            quantize(self.mantissas[i], self.exponents[i]).map(Some)
        }
    }

    /// Expands into one value per logical row.
    pub fn to_dense(&self) -> Result<Vec<Option<i64>>> {
        let mut dense = vec![Some(0); self.len];
        for i in 0..self.entry_count() {
            dense[self.row_ids[i] as usize] = self.entry_value(i)?;
        }
        Ok(dense)
    }

    /// Validates `row` as the next stored row and narrows it to a row id.
    fn next_row_id(&self, row: usize) -> Result<u32> {
        if row >= self.len {
            return Err(Error::index_out_of_range(row, self.len));
        }
        verify_arg!(
            row,
            self.row_ids.last().is_none_or(|&last| (last as usize) < row)
        );
        u32::try_from(row).map_err(|_| Error::invalid_arg("row", "row id exceeds u32::MAX"))
    }

    #[inline]
    fn append(&mut self, row: u32, mantissa: i64, exponent: i32) {
        self.row_ids.push(row);
        self.mantissas.push(mantissa);
        self.exponents.push(exponent);
    }
}

#[cfg(test)]
mod tests {
    use colchunk_common::error::ErrorKind;

    use super::DecimalColumn;
    use crate::decimal::MISSING_EXPONENT;

    #[test]
    fn test_from_dense() {
        let dense = vec![Some(0), Some(3), None, Some(0), Some(-9)];
        let column = DecimalColumn::from_dense(&dense).unwrap();
        assert_eq!(column.len(), 5);
        assert_eq!(column.row_ids(), &[1, 2, 4]);
        assert_eq!(column.exponents(), &[0, MISSING_EXPONENT, 0]);
        assert!(column.is_missing_entry(1).unwrap());
        assert!(!column.is_missing_entry(2).unwrap());
        assert_eq!(column.to_dense().unwrap(), dense);
    }

    #[test]
    fn test_push() {
        let mut column = DecimalColumn::new(10);
        column.push(2, 3, 0).unwrap();
        column.push_missing(5).unwrap();
        column.push(9, 7, 1).unwrap();
        assert_eq!(column.entry_count(), 3);
        assert_eq!(column.entry_value(2).unwrap(), Some(70));
        assert_eq!(column.entry_value(1).unwrap(), None);

        let dense = column.to_dense().unwrap();
        assert_eq!(dense[0], Some(0));
        assert_eq!(dense[2], Some(3));
        assert_eq!(dense[5], None);
        assert_eq!(dense[9], Some(70));
    }

    #[test]
    fn test_push_rejects_bad_input() {
        let mut column = DecimalColumn::new(10);
        column.push_value(4, 1).unwrap();
        assert!(matches!(
            column.push_value(4, 1).unwrap_err().kind(),
            ErrorKind::InvalidArgument { .. }
        ));
        assert!(column.push_value(3, 1).is_err());
        assert!(matches!(
            column.push_value(10, 1).unwrap_err().kind(),
            ErrorKind::IndexOutOfRange { index: 10, len: 10 }
        ));
        assert!(column.push(5, 1, -1).is_err());
        assert!(column.push(5, 1, MISSING_EXPONENT).is_err());
        assert_eq!(column.entry_count(), 1);
    }

    #[test]
    fn test_entry_index_out_of_range() {
        let mut column = DecimalColumn::new(10);
        column.push_value(1, 5).unwrap();
        assert!(matches!(
            column.is_missing_entry(1).unwrap_err().kind(),
            ErrorKind::IndexOutOfRange { index: 1, len: 1 }
        ));
        assert!(matches!(
            column.entry_value(7).unwrap_err().kind(),
            ErrorKind::IndexOutOfRange { index: 7, len: 1 }
        ));
    }

    #[test]
    fn test_row_beyond_u32_rejected() {
        let wide = u32::MAX as usize + 10;
        let mut column = DecimalColumn::new(wide);
        column.push_value(u32::MAX as usize, 3).unwrap();
        assert!(matches!(
            column.push_value(u32::MAX as usize + 1, 3).unwrap_err().kind(),
            ErrorKind::InvalidArgument { .. }
        ));
        assert!(column.push_missing(wide - 1).is_err());
        assert_eq!(column.row_ids(), &[u32::MAX]);
    }
}
