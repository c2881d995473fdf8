// crates/roadwatch-core/src/core/summary.rs
// ============================================================================
// Module: Roadwatch Run Reports
// Description: Structured per-stage decision records and run summaries.
// Purpose: Report progress and skip/validate decisions as countable facts.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Stages do not log free-form text; they record every decision in a report
//! structure. The CLI turns reports into the operator-facing run summary.
//! No structured error codes exist beyond these counts and the process exit
//! status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Skip Reasons
// ============================================================================

/// Reason a candidate pair was skipped by the discovery stage.
///
/// # Invariants
/// - Variants are stable for reporting labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The permit carries no project number and cannot be tracked.
    MissingProjectNumber,
    /// The project number is already pending or already matched.
    AlreadyKnown,
    /// The permit centroid could not be computed.
    DegenerateGeometry,
    /// The resolved jurisdiction is unknown or not in the allowed set.
    JurisdictionNotAllowed,
    /// The permit is not yet publicly published (synchronous path only).
    NotPublished,
}

impl SkipReason {
    /// Returns a stable label for the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingProjectNumber => "missing-project-number",
            Self::AlreadyKnown => "already-known",
            Self::DegenerateGeometry => "degenerate-geometry",
            Self::JurisdictionNotAllowed => "jurisdiction-not-allowed",
            Self::NotPublished => "not-published",
        }
    }
}

/// A single skip decision, attributable to a permit when identifiable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipNote {
    /// Project number of the skipped permit, when known.
    pub project_number: Option<String>,
    /// Why the pair was skipped.
    pub reason: SkipReason,
}

// ============================================================================
// SECTION: Stage Reports
// ============================================================================

/// Outcome of one discovery stage pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// Candidate pairs consumed from the intersection engine.
    pub pairs_seen: usize,
    /// New pending entries appended to the queue.
    pub added: usize,
    /// Permits excluded before pairing because erosion emptied them.
    pub degenerate_permits: usize,
    /// Skip decisions in pair order.
    pub skips: Vec<SkipNote>,
}

impl DiscoveryReport {
    /// Counts skips with the given reason.
    #[must_use]
    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skips.iter().filter(|note| note.reason == reason).count()
    }
}

/// Outcome of one validation stage pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Pending entries checked against the publication checker.
    pub checked: usize,
    /// Entries promoted to the matches store.
    pub validated: usize,
    /// Entries retained because they are not yet published.
    pub still_pending: usize,
    /// Entries retained because their stored geometry failed to parse.
    pub geometry_failures: usize,
    /// Entries retained because map rendering failed.
    pub render_failures: usize,
    /// Project numbers promoted this pass, in queue order.
    pub validated_projects: Vec<String>,
}

// ============================================================================
// SECTION: Run Summary
// ============================================================================

/// Operator-facing summary of a full pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Matches loaded from the persisted store at start of run.
    pub loaded_matches: usize,
    /// Pending entries loaded from the persisted queue at start of run.
    pub loaded_pending: usize,
    /// Road records loaded for the region.
    pub roads_loaded: usize,
    /// Road inventory files skipped as unreadable.
    pub road_files_skipped: usize,
    /// Permit candidates fetched for the recency window.
    pub permits_fetched: usize,
    /// New pending entries discovered this run.
    pub new_pending: usize,
    /// Pending entries validated and promoted this run.
    pub newly_validated: usize,
    /// Pending entries remaining after validation.
    pub remaining_pending: usize,
    /// Total confirmed matches after this run.
    pub total_matches: usize,
}
