//! Conversion between floating coverage and the 8-bit on-disk/pixel form.

use crate::constants::COVERAGE_SCALE;

/// Quantize a coverage value in `[0, 1]` to a byte (round to nearest).
#[inline]
pub fn to_coverage_byte(coverage: f32) -> u8 {
    (coverage.clamp(0.0, 1.0) * COVERAGE_SCALE).round() as u8
}

/// Expand a coverage byte back to `[0, 1]`.
#[inline]
pub fn from_coverage_byte(byte: u8) -> f32 {
    byte as f32 / COVERAGE_SCALE
}
