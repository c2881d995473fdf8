// crates/roadwatch-core/src/core/geometry.rs
// ============================================================================
// Module: Roadwatch Geometry Text Round-Trip
// Description: Well-known-text serialization helpers for persisted geometries.
// Purpose: Decouple persisted state from any particular geometry library.
// Dependencies: geo, thiserror, wkt
// ============================================================================

//! ## Overview
//! Pending and matched records persist their geometries as well-known text so
//! the JSON state files survive geometry-library upgrades. These helpers are
//! the single conversion point between live `geo` types and the stored text
//! form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use geo::Geometry;
use geo::Polygon;
use thiserror::Error;
use wkt::ToWkt;
use wkt::TryFromWkt;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors for well-known-text geometry round-trips.
#[derive(Debug, Error)]
pub enum GeometryTextError {
    /// Stored text could not be parsed back into a geometry.
    #[error("malformed geometry text: {0}")]
    Parse(String),
    /// Stored text parsed into an unexpected geometry kind.
    #[error("unexpected geometry kind: expected {expected}")]
    Kind {
        /// Geometry kind the caller required.
        expected: &'static str,
    },
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Serializes any geometry to well-known text.
#[must_use]
pub fn geometry_to_wkt(geometry: &Geometry<f64>) -> String {
    geometry.wkt_string()
}

/// Serializes a polygon to well-known text.
#[must_use]
pub fn polygon_to_wkt(polygon: &Polygon<f64>) -> String {
    polygon.wkt_string()
}

/// Parses a geometry of any kind from well-known text.
///
/// # Errors
///
/// Returns [`GeometryTextError::Parse`] when the text is not valid WKT.
pub fn geometry_from_wkt(text: &str) -> Result<Geometry<f64>, GeometryTextError> {
    Geometry::try_from_wkt_str(text).map_err(|err| GeometryTextError::Parse(err.to_string()))
}

/// Parses a polygon from well-known text.
///
/// # Errors
///
/// Returns [`GeometryTextError::Parse`] when the text is not valid WKT and
/// [`GeometryTextError::Kind`] when it is valid WKT of a non-polygon kind.
pub fn polygon_from_wkt(text: &str) -> Result<Polygon<f64>, GeometryTextError> {
    match geometry_from_wkt(text)? {
        Geometry::Polygon(polygon) => Ok(polygon),
        _ => Err(GeometryTextError::Kind {
            expected: "Polygon",
        }),
    }
}
