// crates/roadwatch-core/src/runtime/discovery.rs
// ============================================================================
// Module: Roadwatch Discovery Stage
// Description: Dedup, jurisdiction gating, and pending-queue appends.
// Purpose: Turn engine pairs into new pending intersections, idempotently.
// Dependencies: crate::{core, interfaces}, geo
// ============================================================================

//! ## Overview
//! Discovery consumes the intersection engine's pair output and appends new
//! `PendingIntersection` entries to the queue. Re-running discovery on
//! unchanged input never creates duplicates: project numbers already pending
//! or already matched are skipped, and a project discovered earlier in the
//! same pass is skipped for its remaining pairs. Only the first discovered
//! road set is retained for a project; later runs never merge additional
//! roads into an existing entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use geo::Centroid;
use geo::Geometry;
use time::OffsetDateTime;

use crate::core::DiscoveryReport;
use crate::core::MatchesStore;
use crate::core::PendingIntersection;
use crate::core::PendingQueue;
use crate::core::PermitCandidate;
use crate::core::RoadRecord;
use crate::core::SkipNote;
use crate::core::SkipReason;
use crate::core::geometry_to_wkt;
use crate::core::polygon_to_wkt;
use crate::interfaces::JurisdictionResolver;
use crate::interfaces::UNKNOWN_JURISDICTION;
use crate::runtime::intersect::IntersectionOutcome;

// ============================================================================
// SECTION: Discovery Stage
// ============================================================================

/// Discovery stage: filters engine pairs into pending-queue appends.
pub struct DiscoveryStage<'a, J> {
    /// Jurisdiction lookup collaborator.
    resolver: &'a J,
    /// Jurisdiction names permitted into the queue.
    allowed_jurisdictions: &'a BTreeSet<String>,
}

impl<'a, J> DiscoveryStage<'a, J>
where
    J: JurisdictionResolver,
{
    /// Creates a discovery stage over the given resolver and allow-list.
    #[must_use]
    pub const fn new(resolver: &'a J, allowed_jurisdictions: &'a BTreeSet<String>) -> Self {
        Self {
            resolver,
            allowed_jurisdictions,
        }
    }

    /// Runs discovery for one engine outcome, appending to `pending`.
    ///
    /// `matches` is consulted for dedup only and never modified. The caller
    /// persists the queue afterwards when the report counts any additions.
    #[must_use]
    pub fn run(
        &self,
        permits: &[PermitCandidate],
        roads: &[RoadRecord],
        outcome: &IntersectionOutcome,
        pending: &mut PendingQueue,
        matches: &MatchesStore,
        discovered_at: OffsetDateTime,
    ) -> DiscoveryReport {
        let mut known = matches.project_numbers();
        known.append(&mut pending.project_numbers());

        let mut report = DiscoveryReport {
            degenerate_permits: outcome.degenerate_permits.len(),
            ..DiscoveryReport::default()
        };

        for pair in &outcome.pairs {
            let (Some(permit), Some(road)) =
                (permits.get(pair.permit_index), roads.get(pair.road_index))
            else {
                continue;
            };
            report.pairs_seen += 1;

            let Some(project_number) = permit.project_number() else {
                report.skips.push(SkipNote {
                    project_number: None,
                    reason: SkipReason::MissingProjectNumber,
                });
                continue;
            };
            if known.contains(project_number) {
                report.skips.push(SkipNote {
                    project_number: Some(project_number.to_string()),
                    reason: SkipReason::AlreadyKnown,
                });
                continue;
            }

            let Some(centroid) = permit.geometry.centroid() else {
                report.skips.push(SkipNote {
                    project_number: Some(project_number.to_string()),
                    reason: SkipReason::DegenerateGeometry,
                });
                continue;
            };
            let jurisdiction = self.resolver.resolve(centroid);
            if jurisdiction == UNKNOWN_JURISDICTION
                || !self.allowed_jurisdictions.contains(&jurisdiction)
            {
                report.skips.push(SkipNote {
                    project_number: Some(project_number.to_string()),
                    reason: SkipReason::JurisdictionNotAllowed,
                });
                continue;
            }

            pending.push(snapshot(permit, road, jurisdiction, discovered_at));
            known.insert(project_number.to_string());
            report.added += 1;
        }

        report
    }
}

// ============================================================================
// SECTION: Snapshotting
// ============================================================================

/// Snapshots a surviving pair into a pending intersection.
fn snapshot(
    permit: &PermitCandidate,
    road: &RoadRecord,
    jurisdiction: String,
    discovered_at: OffsetDateTime,
) -> PendingIntersection {
    let road_geometry: &Geometry<f64> = &road.geometry;
    PendingIntersection {
        jurisdiction,
        permit_data: permit.attributes.clone(),
        road_data_list: vec![road.attributes.clone()],
        permit_geometry_wkt: polygon_to_wkt(&permit.geometry),
        road_geometries_wkt: vec![geometry_to_wkt(road_geometry)],
        discovered_at,
        road_count: 1,
    }
}
