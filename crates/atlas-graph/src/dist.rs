// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Great-circle distance between encoded coordinates.
//!
//! Uses `libm` transcendentals rather than platform `f64` methods so the
//! derived lengths are bit-stable across hosts.

use crate::coord::{decode_degrees, EncodedCoord};

/// Mean Earth radius (IUGG) in meters.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Haversine distance between two encoded coordinates, in whole meters.
///
/// Rounded to the nearest meter; antipodal inputs saturate the formula
/// at half the Earth's circumference.
pub fn haversine_m(a: EncodedCoord, b: EncodedCoord) -> u32 {
    let lat1 = decode_degrees(a.lat).to_radians();
    let lat2 = decode_degrees(b.lat).to_radians();
    let dlat = lat2 - lat1;
    let dlon = (decode_degrees(b.lon) - decode_degrees(a.lon)).to_radians();

    let s_lat = libm::sin(dlat / 2.0);
    let s_lon = libm::sin(dlon / 2.0);
    let h = s_lat * s_lat + libm::cos(lat1) * libm::cos(lat2) * s_lon * s_lon;
    // Clamp guards the asin domain against rounding at h ≈ 1.
    let d = 2.0 * EARTH_RADIUS_M * libm::asin(libm::sqrt(h.min(1.0)));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        libm::round(d) as u32
    }
}
