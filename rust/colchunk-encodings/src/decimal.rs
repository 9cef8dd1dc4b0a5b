//! Base-10 scaling of quantized decimals (`mantissa * 10^exponent`).

use colchunk_common::{Result, error::Error};

/// Exponent marking a missing value in a (mantissa, exponent) pair.
pub const MISSING_EXPONENT: i32 = i32::MIN;

/// Largest exponent whose power of ten fits in an `i64`.
pub const MAX_EXPONENT: i32 = 18;

const POW10: [i64; MAX_EXPONENT as usize + 1] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000, // 10^18
];

/// Returns `10^exponent`, or `None` when the exponent is negative or the power
/// does not fit in an `i64`.
#[inline]
pub fn pow10i(exponent: i32) -> Option<i64> {
    usize::try_from(exponent)
        .ok()
        .and_then(|e| POW10.get(e).copied())
}

/// Computes `mantissa * 10^exponent` with two's-complement wrap-around on overflow.
///
/// Fails for [`MISSING_EXPONENT`], negative exponents, and exponents above
/// [`MAX_EXPONENT`].
#[inline]
pub fn quantize(mantissa: i64, exponent: i32) -> Result<i64> {
    let scale = pow10i(exponent).ok_or_else(|| {
        Error::invalid_arg(
            "exponent",
            format!("{exponent} is outside of 0..={MAX_EXPONENT}"),
        )
    })?;
    Ok(mantissa.wrapping_mul(scale))
}

#[cfg(test)]
mod tests {
    use super::{MAX_EXPONENT, MISSING_EXPONENT, pow10i, quantize};

    #[test]
    fn test_pow10i() {
        assert_eq!(pow10i(0), Some(1));
        assert_eq!(pow10i(3), Some(1000));
        assert_eq!(pow10i(MAX_EXPONENT), Some(10i64.pow(18)));
        assert_eq!(pow10i(MAX_EXPONENT + 1), None);
        assert_eq!(pow10i(-1), None);
        for e in 0..=MAX_EXPONENT {
            assert_eq!(pow10i(e), Some(10i64.pow(e as u32)));
        }
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(7, 1).unwrap(), 70);
        assert_eq!(quantize(-12, 2).unwrap(), -1200);
        assert_eq!(quantize(i64::MAX, 1).unwrap(), i64::MAX.wrapping_mul(10));
        assert!(quantize(1, -2).is_err());
        assert!(quantize(1, MISSING_EXPONENT).is_err());
        assert!(quantize(1, 19).is_err());
    }
}
