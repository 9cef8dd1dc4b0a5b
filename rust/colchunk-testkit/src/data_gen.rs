//! Data generation utilities for testing.
//!
//! Generates sparse column fragments: a logical length plus a short list of
//! stored rows, each holding either a quantized decimal `(mantissa, exponent)` or a
//! missing value.

use std::ops::RangeInclusive;

/// Shape of a generated fragment.
#[derive(Debug, Clone)]
pub struct SparseFragmentSpec {
    /// Number of logical rows.
    pub len: usize,
    /// Probability that a row is stored explicitly.
    pub density: f64,
    /// Probability that a stored row is missing.
    pub missing_ratio: f64,
    /// Range of generated mantissas. Zero mantissas are skipped.
    pub mantissas: RangeInclusive<i64>,
    /// Largest generated exponent.
    pub max_exponent: i32,
}

impl Default for SparseFragmentSpec {
    fn default() -> Self {
        SparseFragmentSpec {
            len: 1000,
            density: 0.05,
            missing_ratio: 0.1,
            mantissas: -100..=100,
            max_exponent: 2,
        }
    }
}

/// A generated fragment: stored rows in ascending order, `None` marking a missing
/// value.
#[derive(Debug, Clone)]
pub struct SparseFragment {
    pub len: usize,
    pub entries: Vec<(u32, Option<(i64, i32)>)>,
}

impl SparseFragment {
    /// Expands into one value per row, `Some(0)` for rows without an entry.
    pub fn to_dense(&self) -> Vec<Option<i64>> {
        let mut dense = vec![Some(0); self.len];
        for &(row, value) in &self.entries {
            dense[row as usize] = value.map(|(m, e)| m.wrapping_mul(10i64.pow(e as u32)));
        }
        dense
    }
}

/// Generates a sparse fragment following `spec`.
pub fn generate_sparse_fragment(
    rng: &mut fastrand::Rng,
    spec: &SparseFragmentSpec,
) -> SparseFragment {
    assert!(spec.len <= u32::MAX as usize);
    assert!((0..=18).contains(&spec.max_exponent));
    let mut entries = Vec::new();
    for row in 0..spec.len {
        if rng.f64() >= spec.density {
            continue;
        }
        if rng.f64() < spec.missing_ratio {
            entries.push((row as u32, None));
            continue;
        }
        let mantissa = rng.i64(spec.mantissas.clone());
        if mantissa == 0 {
            continue;
        }
        let exponent = rng.i32(0..=spec.max_exponent);
        entries.push((row as u32, Some((mantissa, exponent))));
    }
    SparseFragment {
        len: spec.len,
        entries,
    }
}

/// Returns `0..len` in random order.
pub fn shuffled_rows(rng: &mut fastrand::Rng, len: usize) -> Vec<usize> {
    let mut rows = (0..len).collect::<Vec<_>>();
    rng.shuffle(&mut rows);
    rows
}
