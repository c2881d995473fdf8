// crates/roadwatch-core/src/core/records.rs
// ============================================================================
// Module: Roadwatch Records
// Description: Per-run geometry records and persisted lifecycle records.
// Purpose: Model permits, roads, pending intersections, and confirmed matches.
// Dependencies: crate::core::{attributes, geometry}, geo, serde, time
// ============================================================================

//! ## Overview
//! Two families of records exist. `RoadRecord` and `PermitCandidate` are
//! sourced fresh each run and never persisted on their own. A detected
//! overlap snapshots their attributes and geometry text into a
//! `PendingIntersection`, which the validation stage later promotes into an
//! append-only `MatchRecord` once the permit is publicly published.

// ============================================================================
// SECTION: Imports
// ============================================================================

use geo::Geometry;
use geo::Polygon;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::attributes::AttrMap;
use crate::core::geometry::GeometryTextError;
use crate::core::geometry::geometry_from_wkt;
use crate::core::geometry::polygon_from_wkt;

// ============================================================================
// SECTION: Well-Known Attribute Keys
// ============================================================================

/// Attribute key holding the unique project number of a permit.
pub const PROJECT_NUMBER_KEY: &str = "projectnummer";
/// Attribute key holding the optional permit reference code.
pub const REFERENCE_CODE_KEY: &str = "referentie_project";
/// Attribute key added to road records naming their inventory source file.
pub const SOURCE_FILE_KEY: &str = "source_file";
/// Attribute key added during validation with the public viewing link.
pub const PUBLICATION_LINK_KEY: &str = "publication_link";
/// Attribute key added during validation with the publication status string.
pub const PUBLICATION_STATUS_KEY: &str = "publication_status";

// ============================================================================
// SECTION: Run-Scoped Records
// ============================================================================

/// Inventoried protected road segment, loaded fresh each run.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRecord {
    /// Line geometry in the run's planar projection.
    pub geometry: Geometry<f64>,
    /// Plan attributes, including the source-file tag.
    pub attributes: AttrMap,
}

/// Filed permit application with a polygon footprint, fetched fresh each run.
#[derive(Debug, Clone, PartialEq)]
pub struct PermitCandidate {
    /// Polygon footprint in the run's planar projection.
    pub geometry: Polygon<f64>,
    /// Permit attributes, geometry columns excluded.
    pub attributes: AttrMap,
}

impl PermitCandidate {
    /// Returns the unique project number when present.
    #[must_use]
    pub fn project_number(&self) -> Option<&str> {
        text_attribute(&self.attributes, PROJECT_NUMBER_KEY)
    }

    /// Returns the optional reference code used for artifact naming.
    #[must_use]
    pub fn reference_code(&self) -> Option<&str> {
        text_attribute(&self.attributes, REFERENCE_CODE_KEY)
    }
}

// ============================================================================
// SECTION: Publication Info
// ============================================================================

/// Publication metadata returned by the publication checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationInfo {
    /// Publication status string reported upstream.
    pub status: String,
    /// Stable upstream identifier of the published record.
    pub uuid: String,
}

// ============================================================================
// SECTION: Pending Intersection
// ============================================================================

/// Detected but not-yet-publicly-confirmed permit/road overlap.
///
/// # Invariants
/// - A project number appears in at most one pending entry at any time.
/// - Created only by the discovery stage; removed only by promotion to a
///   [`MatchRecord`] or by explicit removal logic, never dropped silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingIntersection {
    /// Resolved jurisdiction name for the permit location.
    pub jurisdiction: String,
    /// Permit attribute snapshot, geometry columns excluded.
    pub permit_data: AttrMap,
    /// Attribute snapshots of the associated roads, one or more.
    pub road_data_list: Vec<AttrMap>,
    /// Permit footprint as well-known text.
    pub permit_geometry_wkt: String,
    /// Road geometries as well-known text, parallel to `road_data_list`.
    pub road_geometries_wkt: Vec<String>,
    /// Discovery timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub discovered_at: OffsetDateTime,
    /// Number of associated roads.
    pub road_count: usize,
}

impl PendingIntersection {
    /// Returns the project number recorded in the permit snapshot.
    #[must_use]
    pub fn project_number(&self) -> Option<&str> {
        text_attribute(&self.permit_data, PROJECT_NUMBER_KEY)
    }

    /// Returns the reference code recorded in the permit snapshot.
    #[must_use]
    pub fn reference_code(&self) -> Option<&str> {
        text_attribute(&self.permit_data, REFERENCE_CODE_KEY)
    }

    /// Reconstructs the permit footprint from its stored text form.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryTextError`] when the stored text is malformed.
    pub fn permit_geometry(&self) -> Result<Polygon<f64>, GeometryTextError> {
        polygon_from_wkt(&self.permit_geometry_wkt)
    }

    /// Reconstructs the road geometries from their stored text form.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryTextError`] when any stored text is malformed.
    pub fn road_geometries(&self) -> Result<Vec<Geometry<f64>>, GeometryTextError> {
        self.road_geometries_wkt.iter().map(|text| geometry_from_wkt(text)).collect()
    }
}

// ============================================================================
// SECTION: Match Record
// ============================================================================

/// Confirmed, publicly published, rendered intersection record.
///
/// # Invariants
/// - `match_id` is assigned sequentially at append time and never reused.
/// - A project number appears at most once across all match records.
/// - Append-only: never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Sequential match identifier.
    pub match_id: u64,
    /// Resolved jurisdiction name for the permit location.
    pub jurisdiction: String,
    /// Enriched permit snapshot including publication link and status.
    pub permit_data: AttrMap,
    /// Attribute snapshots of the associated roads.
    pub road_data_list: Vec<AttrMap>,
    /// Permit footprint as well-known text.
    pub permit_geometry_wkt: String,
    /// Road geometries as well-known text, parallel to `road_data_list`.
    pub road_geometries_wkt: Vec<String>,
    /// File name of the rendered map artifact under the output directory.
    pub map_file: String,
    /// Validation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub validated_at: OffsetDateTime,
}

impl MatchRecord {
    /// Returns the project number recorded in the permit snapshot.
    #[must_use]
    pub fn project_number(&self) -> Option<&str> {
        text_attribute(&self.permit_data, PROJECT_NUMBER_KEY)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Looks up a textual attribute by key.
fn text_attribute<'a>(attributes: &'a AttrMap, key: &str) -> Option<&'a str> {
    attributes.get(key).and_then(super::attributes::AttrValue::as_text)
}
