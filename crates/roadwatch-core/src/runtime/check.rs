// crates/roadwatch-core/src/runtime/check.rs
// ============================================================================
// Module: Roadwatch Synchronous Checker
// Description: Combined intersection, filtering, and rendering in one pass.
// Purpose: Provide an ad-hoc check-and-render path without queue durability.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The synchronous checker performs intersection, jurisdiction filtering, and
//! publication filtering in memory and appends a `MatchRecord` immediately on
//! success. There is no pending stage and no queue durability, so this path
//! must not be used for the production run; it exists so intersection,
//! filtering, and rendering logic is independently exercisable in one pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;

use geo::Centroid;
use geo::Geometry;
use time::OffsetDateTime;

use crate::core::AttrValue;
use crate::core::MatchRecord;
use crate::core::MatchesStore;
use crate::core::PermitCandidate;
use crate::core::PUBLICATION_LINK_KEY;
use crate::core::PUBLICATION_STATUS_KEY;
use crate::core::RoadRecord;
use crate::core::SkipNote;
use crate::core::SkipReason;
use crate::core::geometry_to_wkt;
use crate::core::polygon_to_wkt;
use crate::interfaces::JurisdictionResolver;
use crate::interfaces::MapRenderer;
use crate::interfaces::PublicationChecker;
use crate::interfaces::RenderRequest;
use crate::interfaces::UNKNOWN_JURISDICTION;
use crate::runtime::intersect::IntersectionEngine;
use crate::runtime::validation::artifact_file_name;

// ============================================================================
// SECTION: Check Report
// ============================================================================

/// Outcome of one synchronous check-and-render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Candidate pairs produced by the intersection engine.
    pub pairs_seen: usize,
    /// Match records appended and rendered.
    pub matched: usize,
    /// Artifact render failures.
    pub render_failures: usize,
    /// Skip decisions in pair order.
    pub skips: Vec<SkipNote>,
}

// ============================================================================
// SECTION: Synchronous Checker
// ============================================================================

/// Combined synchronous intersection/filter/render path.
pub struct SyncChecker<'a, J, C, R> {
    /// Jurisdiction lookup collaborator.
    resolver: &'a J,
    /// Publication lookup collaborator.
    checker: &'a C,
    /// Map artifact renderer.
    renderer: &'a R,
    /// Jurisdiction names permitted to match.
    allowed_jurisdictions: &'a BTreeSet<String>,
    /// Intersection engine with the configured erosion tolerance.
    engine: IntersectionEngine,
    /// Base URL prefix for deterministic publication links.
    publication_link_base: &'a str,
    /// Directory receiving rendered artifacts.
    output_dir: &'a Path,
}

impl<'a, J, C, R> SyncChecker<'a, J, C, R>
where
    J: JurisdictionResolver,
    C: PublicationChecker,
    R: MapRenderer,
{
    /// Creates a synchronous checker over the given collaborators.
    #[must_use]
    pub const fn new(
        resolver: &'a J,
        checker: &'a C,
        renderer: &'a R,
        allowed_jurisdictions: &'a BTreeSet<String>,
        engine: IntersectionEngine,
        publication_link_base: &'a str,
        output_dir: &'a Path,
    ) -> Self {
        Self {
            resolver,
            checker,
            renderer,
            allowed_jurisdictions,
            engine,
            publication_link_base,
            output_dir,
        }
    }

    /// Runs the combined pass over in-memory permit and road collections.
    ///
    /// Each surviving pair that passes both filters is rendered and appended
    /// to `matches` immediately, one record per pair.
    #[must_use]
    pub fn run(
        &self,
        permits: &[PermitCandidate],
        roads: &[RoadRecord],
        matches: &mut MatchesStore,
        checked_at: OffsetDateTime,
    ) -> CheckReport {
        let outcome = self.engine.pairs(permits, roads);
        let mut report = CheckReport {
            pairs_seen: outcome.pairs.len(),
            ..CheckReport::default()
        };

        for pair in &outcome.pairs {
            let (Some(permit), Some(road)) =
                (permits.get(pair.permit_index), roads.get(pair.road_index))
            else {
                continue;
            };
            let Some(project_number) = permit.project_number().map(str::to_string) else {
                report.skips.push(SkipNote {
                    project_number: None,
                    reason: SkipReason::MissingProjectNumber,
                });
                continue;
            };
            let Some(centroid) = permit.geometry.centroid() else {
                report.skips.push(SkipNote {
                    project_number: Some(project_number),
                    reason: SkipReason::DegenerateGeometry,
                });
                continue;
            };
            let jurisdiction = self.resolver.resolve(centroid);
            if jurisdiction == UNKNOWN_JURISDICTION
                || !self.allowed_jurisdictions.contains(&jurisdiction)
            {
                report.skips.push(SkipNote {
                    project_number: Some(project_number),
                    reason: SkipReason::JurisdictionNotAllowed,
                });
                continue;
            }
            let Some(info) = self.checker.check(&project_number) else {
                report.skips.push(SkipNote {
                    project_number: Some(project_number),
                    reason: SkipReason::NotPublished,
                });
                continue;
            };

            let mut permit_data = permit.attributes.clone();
            permit_data.insert(
                PUBLICATION_LINK_KEY.to_string(),
                AttrValue::Text(format!("{}{}", self.publication_link_base, project_number)),
            );
            permit_data.insert(
                PUBLICATION_STATUS_KEY.to_string(),
                AttrValue::Text(info.status.clone()),
            );

            let map_file = artifact_file_name(permit.reference_code(), &project_number);
            let output_path = self.output_dir.join(&map_file);
            let road_geometries: Vec<Geometry<f64>> = vec![road.geometry.clone()];
            let request = RenderRequest {
                permit_geometry: &permit.geometry,
                road_geometries: &road_geometries,
                permit_data: &permit_data,
                road_data_list: std::slice::from_ref(&road.attributes),
                output_path: &output_path,
            };
            if self.renderer.render(&request).is_err() {
                report.render_failures += 1;
                continue;
            }

            matches.push(MatchRecord {
                match_id: matches.next_match_id(),
                jurisdiction,
                permit_data,
                road_data_list: vec![road.attributes.clone()],
                permit_geometry_wkt: polygon_to_wkt(&permit.geometry),
                road_geometries_wkt: vec![geometry_to_wkt(&road.geometry)],
                map_file,
                validated_at: checked_at,
            });
            report.matched += 1;
        }

        report
    }
}
