// crates/roadwatch-core/src/runtime/validation.rs
// ============================================================================
// Module: Roadwatch Validation Stage
// Description: Publication checks and promotion of pending intersections.
// Purpose: Partition the pending queue into promoted matches and retained entries.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Validation walks the pending queue in order, checks publication for each
//! entry, and promotes published entries into the matches store: the permit
//! snapshot is enriched with a deterministic publication link and the
//! returned status, geometries are reconstructed from their stored text, a
//! map artifact is rendered, and a `MatchRecord` is appended with the next
//! sequential identifier. Everything else is retained unchanged and
//! re-checked next run; there is no backoff.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use time::OffsetDateTime;

use crate::core::AttrValue;
use crate::core::MatchRecord;
use crate::core::MatchesStore;
use crate::core::PendingIntersection;
use crate::core::PendingQueue;
use crate::core::PUBLICATION_LINK_KEY;
use crate::core::PUBLICATION_STATUS_KEY;
use crate::core::ValidationReport;
use crate::interfaces::MapRenderer;
use crate::interfaces::PublicationChecker;
use crate::interfaces::RenderRequest;

// ============================================================================
// SECTION: Artifact Naming
// ============================================================================

/// Derives the artifact file name for a permit.
///
/// Uses the reference code when present, else the project number, with
/// path-unsafe characters replaced (`/` becomes `-`, `:` is removed).
#[must_use]
pub fn artifact_file_name(reference_code: Option<&str>, project_number: &str) -> String {
    let raw = reference_code.unwrap_or(project_number);
    let safe = raw.replace('/', "-").replace(':', "");
    format!("match_{safe}.html")
}

// ============================================================================
// SECTION: Validation Stage
// ============================================================================

/// Validation stage: publication checks, rendering, and promotion.
pub struct ValidationStage<'a, C, R> {
    /// Publication lookup collaborator.
    checker: &'a C,
    /// Map artifact renderer.
    renderer: &'a R,
    /// Base URL prefix for deterministic publication links.
    publication_link_base: &'a str,
    /// Directory receiving rendered artifacts.
    output_dir: &'a Path,
}

impl<'a, C, R> ValidationStage<'a, C, R>
where
    C: PublicationChecker,
    R: MapRenderer,
{
    /// Creates a validation stage over the given collaborators.
    #[must_use]
    pub const fn new(
        checker: &'a C,
        renderer: &'a R,
        publication_link_base: &'a str,
        output_dir: &'a Path,
    ) -> Self {
        Self {
            checker,
            renderer,
            publication_link_base,
            output_dir,
        }
    }

    /// Runs validation, returning the still-pending queue and a report.
    ///
    /// Promoted entries are appended to `matches`. Entries whose stored
    /// geometry fails to parse or whose artifact fails to render are
    /// retained so a transient failure cannot drop a detected intersection.
    /// The caller persists queue and store independently afterwards.
    #[must_use]
    pub fn run(
        &self,
        pending: PendingQueue,
        matches: &mut MatchesStore,
        validated_at: OffsetDateTime,
    ) -> (PendingQueue, ValidationReport) {
        let mut report = ValidationReport::default();
        let mut still_pending = PendingQueue::new();

        for entry in pending.into_entries() {
            report.checked += 1;
            let Some(project_number) = entry.project_number().map(str::to_string) else {
                // Untrackable entries stay queued rather than vanishing.
                still_pending.push(entry);
                report.still_pending += 1;
                continue;
            };

            let Some(info) = self.checker.check(&project_number) else {
                still_pending.push(entry);
                report.still_pending += 1;
                continue;
            };

            match self.promote(&entry, &project_number, &info.status, matches, validated_at) {
                Ok(()) => {
                    report.validated += 1;
                    report.validated_projects.push(project_number);
                }
                Err(failure) => {
                    match failure {
                        PromoteFailure::Geometry => report.geometry_failures += 1,
                        PromoteFailure::Render => report.render_failures += 1,
                    }
                    still_pending.push(entry);
                    report.still_pending += 1;
                }
            }
        }

        (still_pending, report)
    }

    /// Renders the artifact and appends the match record for one entry.
    fn promote(
        &self,
        entry: &PendingIntersection,
        project_number: &str,
        status: &str,
        matches: &mut MatchesStore,
        validated_at: OffsetDateTime,
    ) -> Result<(), PromoteFailure> {
        let permit_geometry = entry.permit_geometry().map_err(|_| PromoteFailure::Geometry)?;
        let road_geometries = entry.road_geometries().map_err(|_| PromoteFailure::Geometry)?;

        let mut permit_data = entry.permit_data.clone();
        permit_data.insert(
            PUBLICATION_LINK_KEY.to_string(),
            AttrValue::Text(format!("{}{}", self.publication_link_base, project_number)),
        );
        permit_data
            .insert(PUBLICATION_STATUS_KEY.to_string(), AttrValue::Text(status.to_string()));

        let map_file = artifact_file_name(entry.reference_code(), project_number);
        let output_path: PathBuf = self.output_dir.join(&map_file);
        let request = RenderRequest {
            permit_geometry: &permit_geometry,
            road_geometries: &road_geometries,
            permit_data: &permit_data,
            road_data_list: &entry.road_data_list,
            output_path: &output_path,
        };
        self.renderer.render(&request).map_err(|_| PromoteFailure::Render)?;

        matches.push(MatchRecord {
            match_id: matches.next_match_id(),
            jurisdiction: entry.jurisdiction.clone(),
            permit_data,
            road_data_list: entry.road_data_list.clone(),
            permit_geometry_wkt: entry.permit_geometry_wkt.clone(),
            road_geometries_wkt: entry.road_geometries_wkt.clone(),
            map_file,
            validated_at,
        });
        Ok(())
    }
}

// ============================================================================
// SECTION: Promotion Failures
// ============================================================================

/// Internal classification of a failed promotion attempt.
enum PromoteFailure {
    /// Stored geometry text failed to parse.
    Geometry,
    /// The map artifact failed to render.
    Render,
}
