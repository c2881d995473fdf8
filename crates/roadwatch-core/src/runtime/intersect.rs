// crates/roadwatch-core/src/runtime/intersect.rs
// ============================================================================
// Module: Roadwatch Intersection Engine
// Description: Eroded-footprint intersection test over permit and road sets.
// Purpose: Yield candidate (permit, road) pairs with boundary-touch exclusion.
// Dependencies: crate::core, geo, geo-buffer
// ============================================================================

//! ## Overview
//! The engine shrinks each permit footprint inward by a fixed tolerance
//! before testing, so permits whose boundary merely touches a road edge are
//! excluded rather than reported as encroachments. A permit that erodes to
//! nothing is excluded from consideration entirely. The predicate is the
//! symmetric `intersects`; the original footprint is retained for downstream
//! rendering. Best-effort by design, not a legal-certainty guarantee.

// ============================================================================
// SECTION: Imports
// ============================================================================

use geo::Intersects;
use geo::MultiPolygon;
use geo::Polygon;
use geo_buffer::buffer_polygon;

use crate::core::PermitCandidate;
use crate::core::RoadRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default inward erosion tolerance, in projection distance units.
pub const DEFAULT_EROSION_TOLERANCE: f64 = 1.0;

// ============================================================================
// SECTION: Pair Output
// ============================================================================

/// One surviving candidate pair, indexing into the engine's input slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionPair {
    /// Index of the permit in the permits slice.
    pub permit_index: usize,
    /// Index of the road in the roads slice.
    pub road_index: usize,
}

/// Full engine output for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntersectionOutcome {
    /// Surviving pairs in (permit, road) iteration order.
    pub pairs: Vec<IntersectionPair>,
    /// Indices of permits excluded because erosion emptied their footprint.
    pub degenerate_permits: Vec<usize>,
}

// ============================================================================
// SECTION: Intersection Engine
// ============================================================================

/// Computes eroded-footprint intersections between permits and roads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEngine {
    /// Inward erosion distance applied to permit footprints before testing.
    tolerance: f64,
}

impl Default for IntersectionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_EROSION_TOLERANCE)
    }
}

impl IntersectionEngine {
    /// Creates an engine with the given erosion tolerance.
    #[must_use]
    pub const fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
        }
    }

    /// Computes all candidate pairs for the given permit and road sets.
    ///
    /// Multiple roads may pair with one permit and multiple permits with one
    /// road. Pair order follows the input order: permits outer, roads inner.
    #[must_use]
    pub fn pairs(&self, permits: &[PermitCandidate], roads: &[RoadRecord]) -> IntersectionOutcome {
        let mut outcome = IntersectionOutcome::default();
        for (permit_index, permit) in permits.iter().enumerate() {
            let Some(eroded) = erode(&permit.geometry, self.tolerance) else {
                outcome.degenerate_permits.push(permit_index);
                continue;
            };
            for (road_index, road) in roads.iter().enumerate() {
                if eroded.intersects(&road.geometry) {
                    outcome.pairs.push(IntersectionPair {
                        permit_index,
                        road_index,
                    });
                }
            }
        }
        outcome
    }
}

// ============================================================================
// SECTION: Erosion
// ============================================================================

/// Shrinks a footprint inward, returning `None` when nothing remains.
fn erode(footprint: &Polygon<f64>, tolerance: f64) -> Option<MultiPolygon<f64>> {
    // A ring needs at least four coordinates (closed triangle) to erode.
    if footprint.exterior().0.len() < 4 {
        return None;
    }
    let eroded = buffer_polygon(footprint, -tolerance.abs());
    if eroded.0.is_empty() {
        None
    } else {
        Some(eroded)
    }
}
