// crates/roadwatch-core/src/core/region.rs
// ============================================================================
// Module: Roadwatch Region Bounds
// Description: Fixed planar bounding region for the monitored area.
// Purpose: Provide the spatial window used by sources and filters.
// Dependencies: geo, serde
// ============================================================================

//! ## Overview
//! The monitored region is a fixed axis-aligned box in the planar projection
//! shared by all geometries in a run. Sources use it to window remote queries
//! and to filter local inventory files.

// ============================================================================
// SECTION: Imports
// ============================================================================

use geo::Coord;
use geo::Intersects;
use geo::Rect;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Region Bounds
// ============================================================================

/// Axis-aligned bounding region in the run's planar projection.
///
/// # Invariants
/// - `min_x < max_x` and `min_y < max_y` after configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    /// Minimum easting.
    pub min_x: f64,
    /// Minimum northing.
    pub min_y: f64,
    /// Maximum easting.
    pub max_x: f64,
    /// Maximum northing.
    pub max_y: f64,
}

impl RegionBounds {
    /// Creates region bounds from corner coordinates.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns the bounds as a rectangle geometry.
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.min_x,
                y: self.min_y,
            },
            Coord {
                x: self.max_x,
                y: self.max_y,
            },
        )
    }

    /// Returns true when a geometry bounding box overlaps the region.
    #[must_use]
    pub fn overlaps(&self, bbox: &Rect<f64>) -> bool {
        self.to_rect().intersects(bbox)
    }

    /// Returns true when the corners span a nonzero extent in both axes.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.min_x < self.max_x && self.min_y < self.max_y
    }
}
