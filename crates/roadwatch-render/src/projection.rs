// crates/roadwatch-render/src/projection.rs
// ============================================================================
// Module: Lambert 72 Projection
// Description: Inverse Belgian Lambert 72 projection to geographic degrees.
// Purpose: Reproject analysis geometry for display on web map tiles.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Analysis runs in Belgian Lambert 72 (EPSG:31370), a conformal conic
//! projection on the Hayford ellipsoid. Web map tiles want WGS 84 degrees.
//! The inverse projection below uses the published conic constants with the
//! conventional small angular correction folded in, iterating the latitude
//! series to convergence. Display accuracy is on the order of a meter, which
//! is ample for a viewing map.

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Cone constant of the Lambert 72 conic.
const CONE_CONSTANT: f64 = 0.771_642_19;
/// Mapping radius factor of the conic.
const RADIUS_FACTOR: f64 = 1.813_297_63;
/// Angular correction folded into the inverse, in radians.
const THETA_CORRECTION: f64 = 0.000_142_04;
/// First eccentricity of the Hayford ellipsoid.
const ECCENTRICITY: f64 = 0.081_991_89;
/// Semi-major axis of the Hayford ellipsoid, in meters.
const SEMI_MAJOR_AXIS: f64 = 6_378_388.0;
/// False-origin easting offset, in meters.
const EASTING_OFFSET: f64 = 149_910.0;
/// False-origin northing offset, in meters.
const NORTHING_OFFSET: f64 = 5_400_150.0;
/// Longitude of the central meridian, in radians.
const CENTRAL_MERIDIAN: f64 = 0.076_042_94;
/// Convergence threshold for the latitude iteration, in radians.
const LATITUDE_TOLERANCE: f64 = 2.777_777e-8;
/// Iteration cap for the latitude series.
const MAX_ITERATIONS: u32 = 8;

// ============================================================================
// SECTION: Inverse Projection
// ============================================================================

/// Converts Lambert 72 easting/northing to WGS 84 latitude and longitude in
/// degrees.
#[must_use]
pub fn lambert72_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let easting = EASTING_OFFSET - x;
    let northing = NORTHING_OFFSET - y;
    let rho = easting.hypot(northing);
    let theta = (easting / -northing).atan();

    let longitude = (CENTRAL_MERIDIAN + (theta + THETA_CORRECTION) / CONE_CONSTANT).to_degrees();

    let radial = (rho / (SEMI_MAJOR_AXIS * RADIUS_FACTOR)).powf(1.0 / CONE_CONSTANT);
    let mut latitude = 0.0_f64;
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = latitude.sin();
        let correction =
            ((1.0 - ECCENTRICITY * sin_lat) / (1.0 + ECCENTRICITY * sin_lat)).powf(ECCENTRICITY / 2.0);
        let next = std::f64::consts::FRAC_PI_2 - 2.0 * (radial * correction).atan();
        let delta = (next - latitude).abs();
        latitude = next;
        if delta < LATITUDE_TOLERANCE {
            break;
        }
    }

    (latitude.to_degrees(), longitude)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only output and panic-based assertions are permitted."
    )]

    use super::lambert72_to_wgs84;

    /// A point in the monitored region lands inside Belgium.
    #[test]
    fn region_point_lands_in_belgium() {
        let (lat, lon) = lambert72_to_wgs84(95_000.0, 170_000.0);
        assert!((49.5..51.6).contains(&lat), "latitude {lat} out of range");
        assert!((2.0..7.0).contains(&lon), "longitude {lon} out of range");
    }

    /// Moving north in the projection increases latitude.
    #[test]
    fn northing_increases_latitude() {
        let (south, _) = lambert72_to_wgs84(95_000.0, 160_000.0);
        let (north, _) = lambert72_to_wgs84(95_000.0, 200_000.0);
        assert!(north > south);
    }

    /// Moving east in the projection increases longitude.
    #[test]
    fn easting_increases_longitude() {
        let (_, west) = lambert72_to_wgs84(80_000.0, 170_000.0);
        let (_, east) = lambert72_to_wgs84(120_000.0, 170_000.0);
        assert!(east > west);
    }

    /// The projection origin area maps near the central meridian.
    #[test]
    fn central_point_sits_near_central_meridian() {
        let (_, lon) = lambert72_to_wgs84(150_000.0, 170_000.0);
        assert!((lon - 4.37).abs() < 0.1, "longitude {lon} far from central meridian");
    }
}
