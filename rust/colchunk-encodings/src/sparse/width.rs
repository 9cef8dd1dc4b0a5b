//! Field width classes of the sparse layout and the missing-value sentinels
//! reserved at each value width.
//!
//! All multi-byte fields are little-endian.

use byteorder::{ByteOrder, LE};
use colchunk_common::error::Error;

/// Width of a stored row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RowIdWidth {
    U16 = 2,
    U32 = 4,
}

impl RowIdWidth {
    /// Chunks of at least this many logical rows store 4-byte row ids.
    pub const WIDE_THRESHOLD: usize = 65535;

    /// Selects the row id width for a chunk of `logical_len` rows.
    #[inline]
    pub fn for_len(logical_len: usize) -> RowIdWidth {
        if logical_len >= Self::WIDE_THRESHOLD {
            RowIdWidth::U32
        } else {
            RowIdWidth::U16
        }
    }

    #[inline]
    pub const fn size(self) -> usize {
        self as usize
    }

    /// Reads a row id from the beginning of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than [`size`](Self::size).
    #[inline]
    pub fn read(self, src: &[u8]) -> u32 {
        match self {
            RowIdWidth::U16 => LE::read_u16(src) as u32,
            RowIdWidth::U32 => LE::read_u32(src),
        }
    }

    /// Writes a row id at the beginning of `dst`. The id must fit the width.
    #[inline]
    pub fn write(self, dst: &mut [u8], row: u32) {
        match self {
            RowIdWidth::U16 => LE::write_u16(dst, row as u16),
            RowIdWidth::U32 => LE::write_u32(dst, row),
        }
    }
}

impl TryFrom<u8> for RowIdWidth {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(RowIdWidth::U16),
            4 => Ok(RowIdWidth::U32),
            _ => Err(Error::invalid_format(
                "sparse header",
                format!("row id width {value}"),
            )),
        }
    }
}

/// Width of a stored value.
///
/// `W0` is the presence-only mode: a record carries no payload and its existence
/// means the value `1`. Missing values cannot be represented in this mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ValueWidth {
    W0 = 0,
    W1 = 1,
    W2 = 2,
    W4 = 4,
    W8 = 8,
}

impl ValueWidth {
    /// Non-zero widths, narrowest first.
    pub const PAYLOAD_WIDTHS: [ValueWidth; 4] = [
        ValueWidth::W1,
        ValueWidth::W2,
        ValueWidth::W4,
        ValueWidth::W8,
    ];

    #[inline]
    pub const fn size(self) -> usize {
        self as usize
    }

    /// The bit pattern reserved for a missing value at this width, sign-extended
    /// to `i64`: the minimum representable signed value. `None` for `W0`.
    #[inline]
    pub const fn sentinel(self) -> Option<i64> {
        match self {
            ValueWidth::W0 => None,
            ValueWidth::W1 => Some(i8::MIN as i64),
            ValueWidth::W2 => Some(i16::MIN as i64),
            ValueWidth::W4 => Some(i32::MIN as i64),
            ValueWidth::W8 => Some(i64::MIN),
        }
    }

    /// Returns `true` if the raw value read at this width is the missing-value sentinel.
    #[inline]
    pub fn is_sentinel(self, raw: i64) -> bool {
        self.sentinel() == Some(raw)
    }

    /// Largest storable value.
    #[inline]
    pub const fn max_value(self) -> i64 {
        match self {
            ValueWidth::W0 => 1,
            ValueWidth::W1 => i8::MAX as i64,
            ValueWidth::W2 => i16::MAX as i64,
            ValueWidth::W4 => i32::MAX as i64,
            ValueWidth::W8 => i64::MAX,
        }
    }

    /// Returns `true` if `value` survives a store at this width unchanged and is
    /// not mistaken for the sentinel.
    #[inline]
    pub fn can_hold(self, value: i64) -> bool {
        match self.sentinel() {
            Some(sentinel) => value > sentinel && value <= self.max_value(),
            None => value == 1,
        }
    }

    /// The narrowest non-zero width able to hold every value in `[min, max]`.
    pub fn smallest_for(min: i64, max: i64) -> ValueWidth {
        Self::PAYLOAD_WIDTHS
            .into_iter()
            .find(|width| width.can_hold(min) && width.can_hold(max))
            .unwrap_or(ValueWidth::W8)
    }

    /// Reads a sign-extended value from the beginning of `src`. `W0` reads as `1`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than [`size`](Self::size).
    #[inline]
    pub fn read(self, src: &[u8]) -> i64 {
        match self {
            ValueWidth::W0 => 1,
            ValueWidth::W1 => src[0] as i8 as i64,
            ValueWidth::W2 => LE::read_i16(src) as i64,
            ValueWidth::W4 => LE::read_i32(src) as i64,
            ValueWidth::W8 => LE::read_i64(src),
        }
    }

    /// Writes `value` truncated to this width at the beginning of `dst`.
    /// Bits above the width are dropped. `W0` writes nothing.
    #[inline]
    pub fn write(self, dst: &mut [u8], value: i64) {
        match self {
            ValueWidth::W0 => (),
            ValueWidth::W1 => dst[0] = value as i8 as u8,
            ValueWidth::W2 => LE::write_i16(dst, value as i16),
            ValueWidth::W4 => LE::write_i32(dst, value as i32),
            ValueWidth::W8 => LE::write_i64(dst, value),
        }
    }

    /// Writes the missing-value sentinel. Fails for `W0`.
    pub fn write_sentinel(self, dst: &mut [u8]) -> colchunk_common::Result<()> {
        let sentinel = self.sentinel().ok_or_else(|| {
            Error::invalid_arg(
                "value_width",
                "missing values are not representable in presence-only mode",
            )
        })?;
        self.write(dst, sentinel);
        Ok(())
    }
}

impl TryFrom<u8> for ValueWidth {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ValueWidth::W0),
            1 => Ok(ValueWidth::W1),
            2 => Ok(ValueWidth::W2),
            4 => Ok(ValueWidth::W4),
            8 => Ok(ValueWidth::W8),
            _ => Err(Error::invalid_arg(
                "value_width",
                format!("{value} is not one of 0, 1, 2, 4, 8"),
            )),
        }
    }
}
