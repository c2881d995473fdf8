// crates/roadwatch-core/src/interfaces/mod.rs
// ============================================================================
// Module: Roadwatch Interfaces
// Description: Collaborator contracts for geodata, lookups, and rendering.
// Purpose: Define the seams the pipeline uses to reach external systems.
// Dependencies: crate::core, geo, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Roadwatch integrates with external systems without
//! embedding wire formats. Lookup collaborators degrade locally on transient
//! failure (jurisdiction to `"unknown"`, publication to absent) and never
//! abort a run; source collaborators surface setup failures, which are fatal
//! before any persisted state is touched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use geo::Geometry;
use geo::Point;
use geo::Polygon;
use thiserror::Error;
use time::Date;

use crate::core::AttrMap;
use crate::core::PermitCandidate;
use crate::core::PublicationInfo;
use crate::core::RegionBounds;
use crate::core::RoadRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Jurisdiction name returned when resolution fails or finds nothing.
pub const UNKNOWN_JURISDICTION: &str = "unknown";

// ============================================================================
// SECTION: Geometry Sources
// ============================================================================

/// Errors raised by geometry source adapters.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No usable data could be loaded at all; fatal for the run.
    #[error("source setup failure: {0}")]
    Setup(String),
    /// A file or response could not be read or parsed.
    #[error("source read failure: {0}")]
    Read(String),
}

/// Result of one road inventory load.
#[derive(Debug, Clone, Default)]
pub struct RoadInventory {
    /// Road records overlapping the region bounds.
    pub records: Vec<RoadRecord>,
    /// Unreadable or unparsable inventory files, with the failure text.
    pub skipped_files: Vec<String>,
}

/// Supplies the protected-road inventory for the monitored region.
pub trait RoadSource {
    /// Loads all road records overlapping the region bounds.
    ///
    /// Files that cannot be read are skipped individually and reported in
    /// [`RoadInventory::skipped_files`] so the caller can surface them.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Setup`] when no road data is loadable at all.
    fn load(&self, bounds: &RegionBounds) -> Result<RoadInventory, SourceError>;
}

/// Supplies recently filed permit candidates for the monitored region.
pub trait PermitSource {
    /// Fetches permit candidates filed on or after `since` within the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the upstream query cannot be issued at
    /// all. Per-layer failures degrade to an empty contribution instead.
    fn fetch(&self, bounds: &RegionBounds, since: Date)
    -> Result<Vec<PermitCandidate>, SourceError>;
}

// ============================================================================
// SECTION: Jurisdiction Resolver
// ============================================================================

/// Maps a planar point to a jurisdiction name.
pub trait JurisdictionResolver {
    /// Resolves the jurisdiction containing `location`.
    ///
    /// Returns [`UNKNOWN_JURISDICTION`] when the point matches no
    /// jurisdiction or the lookup fails transiently.
    fn resolve(&self, location: Point<f64>) -> String;
}

// ============================================================================
// SECTION: Publication Checker
// ============================================================================

/// Reports whether a permit is publicly published.
pub trait PublicationChecker {
    /// Checks publication state for a project number.
    ///
    /// Returns `None` when the permit is not published or the lookup fails
    /// transiently; the entry is simply re-checked on the next run.
    fn check(&self, project_number: &str) -> Option<PublicationInfo>;
}

// ============================================================================
// SECTION: Map Renderer
// ============================================================================

/// Errors raised by map renderers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The artifact could not be composed.
    #[error("map render failed: {0}")]
    Render(String),
    /// The artifact could not be written to its output path.
    #[error("artifact write failed: {0}")]
    Io(String),
}

/// One render invocation: a permit footprint with its intersecting roads.
#[derive(Debug)]
pub struct RenderRequest<'a> {
    /// Original, non-eroded permit footprint.
    pub permit_geometry: &'a Polygon<f64>,
    /// Geometries of the intersecting roads.
    pub road_geometries: &'a [Geometry<f64>],
    /// Permit attribute snapshot shown in the artifact.
    pub permit_data: &'a AttrMap,
    /// Road attribute snapshots, parallel to `road_geometries`.
    pub road_data_list: &'a [AttrMap],
    /// Destination path of the self-contained artifact.
    pub output_path: &'a Path,
}

/// Produces a self-contained visual artifact for a permit/roads overlap.
pub trait MapRenderer {
    /// Renders the artifact described by `request` to its output path.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when composition or writing fails.
    fn render(&self, request: &RenderRequest<'_>) -> Result<(), RenderError>;
}
