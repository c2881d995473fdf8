// crates/roadwatch-core/src/lib.rs
// ============================================================================
// Module: Roadwatch Core Library
// Description: Public API surface for the Roadwatch core.
// Purpose: Expose the data model, collaborator interfaces, and pipeline stages.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Roadwatch core implements the discovery-and-deferred-validation pipeline
//! for permit/protected-road intersections: the intersection engine, the
//! discovery and validation stages, the combined synchronous checker, and the
//! persisted pending/matches state. External collaborators (geodata sources,
//! jurisdiction lookup, publication check, map rendering) integrate through
//! explicit interfaces rather than being embedded here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::JurisdictionResolver;
pub use interfaces::MapRenderer;
pub use interfaces::PermitSource;
pub use interfaces::PublicationChecker;
pub use interfaces::RenderError;
pub use interfaces::RenderRequest;
pub use interfaces::RoadInventory;
pub use interfaces::RoadSource;
pub use interfaces::SourceError;
pub use interfaces::UNKNOWN_JURISDICTION;
pub use runtime::CheckReport;
pub use runtime::DEFAULT_EROSION_TOLERANCE;
pub use runtime::DiscoveryStage;
pub use runtime::IntersectionEngine;
pub use runtime::IntersectionOutcome;
pub use runtime::IntersectionPair;
pub use runtime::StateStore;
pub use runtime::StoreError;
pub use runtime::SyncChecker;
pub use runtime::ValidationStage;
pub use runtime::artifact_file_name;
