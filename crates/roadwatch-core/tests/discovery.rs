// crates/roadwatch-core/tests/discovery.rs
// ============================================================================
// Module: Discovery Stage Tests
// Description: Tests for dedup, jurisdiction gating, and queue appends.
// Purpose: Validate idempotence and the non-merging pending model.
// Dependencies: roadwatch-core, geo
// ============================================================================

//! ## Overview
//! Covers the discovery contract: unidentifiable permits are skipped, known
//! project numbers never duplicate, disallowed or unknown jurisdictions never
//! enter the queue, and a project pending from an earlier pair keeps only its
//! first road set.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use roadwatch_core::DiscoveryStage;
use roadwatch_core::IntersectionEngine;
use roadwatch_core::MatchRecord;
use roadwatch_core::MatchesStore;
use roadwatch_core::PendingQueue;
use roadwatch_core::PermitCandidate;
use roadwatch_core::SkipReason;
use roadwatch_core::polygon_to_wkt;

use crate::common::RUN_TIME;
use crate::common::StaticResolver;
use crate::common::allowed;
use crate::common::attrs;
use crate::common::crossing_road;
use crate::common::crossing_road_vertical;
use crate::common::square_permit;

/// Verifies a new allowed-jurisdiction intersection enters the queue.
#[test]
fn new_intersection_is_queued() {
    let permits = vec![square_permit("P001")];
    let roads = vec![crossing_road("R001")];
    let outcome = IntersectionEngine::default().pairs(&permits, &roads);
    let resolver = StaticResolver::new("Westdorp");
    let allow = allowed(&["Westdorp"]);
    let stage = DiscoveryStage::new(&resolver, &allow);
    let mut pending = PendingQueue::new();
    let matches = MatchesStore::new();

    let report = stage.run(&permits, &roads, &outcome, &mut pending, &matches, RUN_TIME);

    assert_eq!(report.added, 1);
    assert_eq!(pending.len(), 1);
    let entry = &pending.entries()[0];
    assert_eq!(entry.jurisdiction, "Westdorp");
    assert_eq!(entry.project_number(), Some("P001"));
    assert_eq!(entry.road_count, 1);
    assert_eq!(entry.road_data_list.len(), 1);
    assert_eq!(entry.discovered_at, RUN_TIME);
    // Geometry snapshots round-trip through their text form.
    assert!(entry.permit_geometry().is_ok());
    assert_eq!(entry.road_geometries().unwrap().len(), 1);
}

/// Verifies running discovery twice on unchanged input adds nothing.
#[test]
fn discovery_is_idempotent() {
    let permits = vec![square_permit("P001")];
    let roads = vec![crossing_road("R001")];
    let outcome = IntersectionEngine::default().pairs(&permits, &roads);
    let resolver = StaticResolver::new("Westdorp");
    let allow = allowed(&["Westdorp"]);
    let stage = DiscoveryStage::new(&resolver, &allow);
    let mut pending = PendingQueue::new();
    let matches = MatchesStore::new();

    let first = stage.run(&permits, &roads, &outcome, &mut pending, &matches, RUN_TIME);
    let second = stage.run(&permits, &roads, &outcome, &mut pending, &matches, RUN_TIME);

    assert_eq!(first.added, 1);
    assert_eq!(second.added, 0);
    assert_eq!(second.skipped(SkipReason::AlreadyKnown), 1);
    assert_eq!(pending.len(), 1);
}

/// Verifies a permit without a project number is skipped, not tracked.
#[test]
fn permit_without_project_number_is_skipped() {
    let unidentifiable = PermitCandidate {
        attributes: attrs(&[("status", "new")]),
        ..square_permit("ignored")
    };
    let permits = vec![unidentifiable];
    let roads = vec![crossing_road("R001")];
    let outcome = IntersectionEngine::default().pairs(&permits, &roads);
    let resolver = StaticResolver::new("Westdorp");
    let allow = allowed(&["Westdorp"]);
    let stage = DiscoveryStage::new(&resolver, &allow);
    let mut pending = PendingQueue::new();
    let matches = MatchesStore::new();

    let report = stage.run(&permits, &roads, &outcome, &mut pending, &matches, RUN_TIME);

    assert_eq!(report.added, 0);
    assert_eq!(report.skipped(SkipReason::MissingProjectNumber), 1);
    assert!(pending.is_empty());
}

/// Verifies disallowed and unknown jurisdictions never enter the queue.
#[test]
fn jurisdiction_gate_rejects_disallowed_and_unknown() {
    let permits = vec![square_permit("P001")];
    let roads = vec![crossing_road("R001")];
    let outcome = IntersectionEngine::default().pairs(&permits, &roads);
    let allow = allowed(&["Westdorp"]);
    let matches = MatchesStore::new();

    let elsewhere = StaticResolver::new("Oostdorp");
    let mut pending = PendingQueue::new();
    let report = DiscoveryStage::new(&elsewhere, &allow).run(
        &permits,
        &roads,
        &outcome,
        &mut pending,
        &matches,
        RUN_TIME,
    );
    assert_eq!(report.skipped(SkipReason::JurisdictionNotAllowed), 1);
    assert!(pending.is_empty());

    let unresolved = StaticResolver::unknown();
    let report = DiscoveryStage::new(&unresolved, &allow).run(
        &permits,
        &roads,
        &outcome,
        &mut pending,
        &matches,
        RUN_TIME,
    );
    assert_eq!(report.skipped(SkipReason::JurisdictionNotAllowed), 1);
    assert!(pending.is_empty());
}

/// Verifies a project already matched is never re-queued.
#[test]
fn matched_project_is_never_requeued() {
    let permits = vec![square_permit("P001")];
    let roads = vec![crossing_road("R001")];
    let outcome = IntersectionEngine::default().pairs(&permits, &roads);
    let resolver = StaticResolver::new("Westdorp");
    let allow = allowed(&["Westdorp"]);
    let stage = DiscoveryStage::new(&resolver, &allow);
    let mut pending = PendingQueue::new();
    let matches = MatchesStore::from_records(vec![MatchRecord {
        match_id: 0,
        jurisdiction: "Westdorp".to_string(),
        permit_data: attrs(&[("projectnummer", "P001")]),
        road_data_list: vec![attrs(&[("segment", "R001")])],
        permit_geometry_wkt: polygon_to_wkt(&square_permit("P001").geometry),
        road_geometries_wkt: vec!["LINESTRING(-5 5,15 5)".to_string()],
        map_file: "match_P001.html".to_string(),
        validated_at: RUN_TIME,
    }]);

    let report = stage.run(&permits, &roads, &outcome, &mut pending, &matches, RUN_TIME);

    assert_eq!(report.added, 0);
    assert_eq!(report.skipped(SkipReason::AlreadyKnown), 1);
    assert!(pending.is_empty());
}

/// Documents the non-merging model: only the first road set is retained for
/// a project, both for later pairs in the same run and for later runs.
#[test]
fn discovery_does_not_merge_additional_roads() {
    let permits = vec![square_permit("P001")];
    let roads = vec![crossing_road("R001"), crossing_road_vertical("R002")];
    let outcome = IntersectionEngine::default().pairs(&permits, &roads);
    assert_eq!(outcome.pairs.len(), 2);

    let resolver = StaticResolver::new("Westdorp");
    let allow = allowed(&["Westdorp"]);
    let stage = DiscoveryStage::new(&resolver, &allow);
    let mut pending = PendingQueue::new();
    let matches = MatchesStore::new();

    let report = stage.run(&permits, &roads, &outcome, &mut pending, &matches, RUN_TIME);
    assert_eq!(report.added, 1);
    assert_eq!(report.skipped(SkipReason::AlreadyKnown), 1);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending.entries()[0].road_count, 1);

    // A later run with a third crossing road still merges nothing.
    let more_roads = vec![
        crossing_road("R001"),
        crossing_road_vertical("R002"),
        crossing_road_vertical("R003"),
    ];
    let outcome = IntersectionEngine::default().pairs(&permits, &more_roads);
    let report = stage.run(&permits, &more_roads, &outcome, &mut pending, &matches, RUN_TIME);
    assert_eq!(report.added, 0);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending.entries()[0].road_data_list.len(), 1);
}

/// Verifies the dedup invariant across both stores after discovery.
#[test]
fn project_number_is_unique_across_stores() {
    let permits = vec![square_permit("P001"), square_permit("P001")];
    let roads = vec![crossing_road("R001")];
    let outcome = IntersectionEngine::default().pairs(&permits, &roads);
    let resolver = StaticResolver::new("Westdorp");
    let allow = allowed(&["Westdorp"]);
    let stage = DiscoveryStage::new(&resolver, &allow);
    let mut pending = PendingQueue::new();
    let matches = MatchesStore::new();

    let _report = stage.run(&permits, &roads, &outcome, &mut pending, &matches, RUN_TIME);

    let pending_count = pending.project_numbers().len();
    let matched_count = matches.project_numbers().len();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending_count + matched_count, 1);
}
