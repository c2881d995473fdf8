// crates/roadwatch-render/src/lib.rs
// ============================================================================
// Module: Roadwatch Render Library
// Description: Map artifact rendering for confirmed intersections.
// Purpose: Produce the per-match HTML artifact written next to the store.
// Dependencies: roadwatch-core, geo, geojson
// ============================================================================

//! ## Overview
//! Each confirmed match gets one self-contained interactive HTML map: the
//! permit footprint, the intersecting road segments with their attribute
//! tables, and toggleable reference overlays. Input geometry arrives in the
//! run's planar projection and is reprojected to geographic coordinates for
//! display.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod leaflet;
pub mod projection;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use leaflet::LeafletMapRenderer;
pub use leaflet::LeafletRenderOptions;
pub use leaflet::WmsOverlay;
pub use projection::lambert72_to_wgs84;
