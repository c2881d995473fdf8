// crates/roadwatch-core/src/core/mod.rs
// ============================================================================
// Module: Roadwatch Core Types
// Description: Canonical Roadwatch data model and persisted state structures.
// Purpose: Provide stable, serializable types for permit/road intersections.
// Dependencies: geo, serde, time, wkt
// ============================================================================

//! ## Overview
//! Roadwatch core types define the attribute model, the per-run geometry
//! records, the persisted pending queue and matches store, and the run
//! reports. These types are the canonical source of truth for the JSON state
//! files that survive across runs.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod attributes;
pub mod geometry;
pub mod records;
pub mod region;
pub mod state;
pub mod summary;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use attributes::AttrMap;
pub use attributes::snapshot_from_json;
pub use attributes::AttrValue;
pub use geometry::GeometryTextError;
pub use geometry::geometry_from_wkt;
pub use geometry::geometry_to_wkt;
pub use geometry::polygon_from_wkt;
pub use geometry::polygon_to_wkt;
pub use records::MatchRecord;
pub use records::PendingIntersection;
pub use records::PermitCandidate;
pub use records::PublicationInfo;
pub use records::RoadRecord;
pub use records::PROJECT_NUMBER_KEY;
pub use records::PUBLICATION_LINK_KEY;
pub use records::PUBLICATION_STATUS_KEY;
pub use records::REFERENCE_CODE_KEY;
pub use records::SOURCE_FILE_KEY;
pub use region::RegionBounds;
pub use state::MatchesStore;
pub use state::PendingQueue;
pub use summary::DiscoveryReport;
pub use summary::RunSummary;
pub use summary::SkipNote;
pub use summary::SkipReason;
pub use summary::ValidationReport;
