// crates/roadwatch-providers/src/lib.rs
// ============================================================================
// Module: Roadwatch Providers Library
// Description: Concrete adapters for the core collaborator interfaces.
// Purpose: Connect the pipeline to geodata files and remote services.
// Dependencies: roadwatch-core, geojson, reqwest
// ============================================================================

//! ## Overview
//! Providers implement the core collaborator interfaces against real data:
//! a GeoJSON directory for the protected-road inventory, a WFS endpoint for
//! permit decisions, a boundary WFS for jurisdiction lookups, and a register
//! endpoint for publication checks. Lookup providers degrade locally on
//! transient failure; source providers fail the run only when nothing is
//! loadable at all.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod jurisdiction;
pub mod publication;
pub mod roads;
pub mod wfs;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use jurisdiction::JurisdictionLookupConfig;
pub use jurisdiction::WfsJurisdictionResolver;
pub use publication::HeaderPublicationChecker;
pub use publication::PublicationCheckConfig;
pub use roads::GeoJsonRoadSource;
pub use wfs::WfsPermitConfig;
pub use wfs::WfsPermitSource;
