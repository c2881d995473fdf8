// crates/roadwatch-core/src/runtime/mod.rs
// ============================================================================
// Module: Roadwatch Runtime
// Description: Pipeline stages and persisted-state store.
// Purpose: Execute discovery and deferred validation over the data model.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime is the only part of Roadwatch with lifecycle logic: the
//! intersection engine, the discovery stage feeding the pending queue, the
//! validation stage promoting pending entries into matches, the combined
//! synchronous checker, and the JSON state store.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod check;
pub mod discovery;
pub mod intersect;
pub mod store;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use check::CheckReport;
pub use check::SyncChecker;
pub use discovery::DiscoveryStage;
pub use intersect::DEFAULT_EROSION_TOLERANCE;
pub use intersect::IntersectionEngine;
pub use intersect::IntersectionOutcome;
pub use intersect::IntersectionPair;
pub use store::StateStore;
pub use store::StoreError;
pub use validation::ValidationStage;
pub use validation::artifact_file_name;
