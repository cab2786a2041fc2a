// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-point degree encoding (7 decimal digits).
//!
//! Coordinates are stored as `i32` fixed-point units — degrees scaled by
//! `10^7` — so archive round-trips and comparisons are exact. `±180°`
//! longitude and `±90°` latitude both fit the `i32` range at this scale.

use thiserror::Error;

/// Scale between degrees and fixed-point units (7 decimal digits).
pub const COORD_SCALE: i32 = 10_000_000;

/// Error returned by [`encode_degrees`] for values the fixed-point range
/// cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    /// The input was NaN or infinite.
    #[error("coordinate is not finite: {0}")]
    NonFinite(f64),
    /// The scaled magnitude does not fit an `i32`.
    #[error("coordinate overflows fixed-point range: {0}")]
    Overflow(f64),
}

/// Encoded `(lon, lat)` pair in fixed-point units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedCoord {
    /// Longitude in fixed-point units.
    pub lon: i32,
    /// Latitude in fixed-point units.
    pub lat: i32,
}

/// Encodes a degree value into fixed-point units, truncating toward zero.
///
/// Truncation (not rounding) matches the established archive semantics;
/// the error stays below one unit of the 7-decimal scale either way.
///
/// # Errors
///
/// - [`CoordError::NonFinite`] for NaN or infinite input
/// - [`CoordError::Overflow`] when the scaled magnitude leaves the `i32`
///   range (no geographic range-check beyond numeric fit)
pub fn encode_degrees(value: f64) -> Result<i32, CoordError> {
    if !value.is_finite() {
        return Err(CoordError::NonFinite(value));
    }
    let scaled = (value * f64::from(COORD_SCALE)).trunc();
    if scaled < f64::from(i32::MIN) || scaled > f64::from(i32::MAX) {
        return Err(CoordError::Overflow(value));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(scaled as i32)
}

/// Decodes fixed-point units back to (approximate) degrees.
pub fn decode_degrees(units: i32) -> f64 {
    f64::from(units) / f64::from(COORD_SCALE)
}
