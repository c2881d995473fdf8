// crates/roadwatch-core/src/core/state.rs
// ============================================================================
// Module: Roadwatch Persisted State
// Description: Pending queue and matches store collections.
// Purpose: Own the ordered, deduplicated lifecycle collections for a run.
// Dependencies: crate::core::records, serde
// ============================================================================

//! ## Overview
//! The pending queue and the matches store are each a single ordered
//! collection, exclusively owned by the pipeline process for the run's
//! duration. They serialize transparently as JSON arrays, which is exactly
//! the persisted file format.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::records::MatchRecord;
use crate::core::records::PendingIntersection;

// ============================================================================
// SECTION: Pending Queue
// ============================================================================

/// Ordered queue of in-flight pending intersections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingQueue {
    /// Queue entries in discovery order.
    entries: Vec<PendingIntersection>,
}

impl PendingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Wraps existing entries, preserving their order.
    #[must_use]
    pub fn from_entries(entries: Vec<PendingIntersection>) -> Self {
        Self {
            entries,
        }
    }

    /// Returns the queue entries in order.
    #[must_use]
    pub fn entries(&self) -> &[PendingIntersection] {
        &self.entries
    }

    /// Consumes the queue, returning its entries in order.
    #[must_use]
    pub fn into_entries(self) -> Vec<PendingIntersection> {
        self.entries
    }

    /// Returns the number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the set of project numbers currently queued.
    #[must_use]
    pub fn project_numbers(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter_map(|entry| entry.project_number().map(str::to_string))
            .collect()
    }

    /// Appends an entry to the back of the queue.
    pub fn push(&mut self, entry: PendingIntersection) {
        self.entries.push(entry);
    }
}

// ============================================================================
// SECTION: Matches Store
// ============================================================================

/// Append-only store of confirmed matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchesStore {
    /// Match records in append order.
    records: Vec<MatchRecord>,
}

impl MatchesStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Wraps existing records, preserving their order.
    #[must_use]
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        Self {
            records,
        }
    }

    /// Returns the match records in append order.
    #[must_use]
    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    /// Returns the number of stored matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no matches are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the set of project numbers already matched.
    #[must_use]
    pub fn project_numbers(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|record| record.project_number().map(str::to_string))
            .collect()
    }

    /// Returns the next sequential match identifier.
    ///
    /// Equals the store size for an intact store. When earlier entries were
    /// removed out of band the identifier stays monotone instead of reusing
    /// a released value.
    #[must_use]
    pub fn next_match_id(&self) -> u64 {
        let from_len = u64::try_from(self.records.len()).unwrap_or(u64::MAX);
        let from_ids = self
            .records
            .iter()
            .map(|record| record.match_id.saturating_add(1))
            .max()
            .unwrap_or(0);
        from_len.max(from_ids)
    }

    /// Appends a match record.
    pub fn push(&mut self, record: MatchRecord) {
        self.records.push(record);
    }
}
