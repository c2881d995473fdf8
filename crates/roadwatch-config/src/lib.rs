// crates/roadwatch-config/src/lib.rs
// ============================================================================
// Module: Roadwatch Config Library
// Description: Canonical configuration model and validation.
// Purpose: Single source of truth for roadwatch.toml semantics.
// Dependencies: roadwatch-core, serde, toml
// ============================================================================

//! ## Overview
//! `roadwatch-config` defines the explicit configuration structure passed to
//! each pipeline stage: region bounds, the jurisdiction allow-list, state
//! file paths, the lookback window, collaborator endpoints, and timeouts.
//! Nothing is read from mutable module state; loading is strict and fails
//! closed on invalid values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
