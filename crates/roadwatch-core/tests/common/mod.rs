// crates/roadwatch-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Fixtures
// Description: Shared permits, roads, and collaborator stubs for core tests.
// Purpose: Keep stage tests focused on lifecycle behavior.
// Dependencies: roadwatch-core, geo
// ============================================================================

//! ## Overview
//! Deterministic fixtures in a plain planar coordinate frame: a 10x10 permit
//! square crossed by a horizontal road line, plus simple collaborator stubs
//! with scriptable answers.

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
    dead_code,
    reason = "Test-only fixtures; not every suite uses every helper."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::sync::Mutex;

use geo::Geometry;
use geo::Point;
use geo::line_string;
use geo::polygon;
use roadwatch_core::AttrMap;
use roadwatch_core::AttrValue;
use roadwatch_core::JurisdictionResolver;
use roadwatch_core::MapRenderer;
use roadwatch_core::PermitCandidate;
use roadwatch_core::PublicationChecker;
use roadwatch_core::PublicationInfo;
use roadwatch_core::RenderError;
use roadwatch_core::RenderRequest;
use roadwatch_core::RoadRecord;
use roadwatch_core::UNKNOWN_JURISDICTION;
use time::OffsetDateTime;
use time::macros::datetime;

/// Fixed timestamp used across lifecycle tests.
pub const RUN_TIME: OffsetDateTime = datetime!(2026-03-01 06:00 UTC);

/// Publication link base used across lifecycle tests.
pub const LINK_BASE: &str = "https://permits.example.test/";

/// Builds an attribute map from string pairs.
pub fn attrs(pairs: &[(&str, &str)]) -> AttrMap {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), AttrValue::Text((*value).to_string())))
        .collect()
}

/// A 10x10 permit square at the origin with the given project number.
pub fn square_permit(project_number: &str) -> PermitCandidate {
    PermitCandidate {
        geometry: polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ],
        attributes: attrs(&[("projectnummer", project_number)]),
    }
}

/// A permit square far outside every road fixture.
pub fn distant_permit(project_number: &str) -> PermitCandidate {
    PermitCandidate {
        geometry: polygon![
            (x: 500.0, y: 500.0),
            (x: 510.0, y: 500.0),
            (x: 510.0, y: 510.0),
            (x: 500.0, y: 510.0),
            (x: 500.0, y: 500.0),
        ],
        attributes: attrs(&[("projectnummer", project_number)]),
    }
}

/// A road line crossing the origin square horizontally through its middle.
pub fn crossing_road(segment: &str) -> RoadRecord {
    RoadRecord {
        geometry: Geometry::LineString(line_string![
            (x: -5.0, y: 5.0),
            (x: 15.0, y: 5.0),
        ]),
        attributes: attrs(&[("segment", segment)]),
    }
}

/// A road line running exactly along the west edge of the origin square.
pub fn touching_road(segment: &str) -> RoadRecord {
    RoadRecord {
        geometry: Geometry::LineString(line_string![
            (x: 0.0, y: -5.0),
            (x: 0.0, y: 15.0),
        ]),
        attributes: attrs(&[("segment", segment)]),
    }
}

/// A road line crossing the origin square vertically through its middle.
pub fn crossing_road_vertical(segment: &str) -> RoadRecord {
    RoadRecord {
        geometry: Geometry::LineString(line_string![
            (x: 5.0, y: -5.0),
            (x: 5.0, y: 15.0),
        ]),
        attributes: attrs(&[("segment", segment)]),
    }
}

/// Builds the allow-list used by discovery tests.
pub fn allowed(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

/// Resolver answering with one fixed jurisdiction for every point.
pub struct StaticResolver {
    /// Jurisdiction returned for every lookup.
    pub jurisdiction: String,
}

impl StaticResolver {
    /// Creates a resolver that always answers `name`.
    pub fn new(name: &str) -> Self {
        Self {
            jurisdiction: name.to_string(),
        }
    }

    /// Creates a resolver that always fails to resolve.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_JURISDICTION)
    }
}

impl JurisdictionResolver for StaticResolver {
    fn resolve(&self, _location: Point<f64>) -> String {
        self.jurisdiction.clone()
    }
}

/// Checker answering from a fixed published-projects table.
#[derive(Default)]
pub struct TableChecker {
    /// Published project numbers and their status strings.
    published: BTreeMap<String, String>,
    /// Project numbers queried, in call order.
    pub queried: Mutex<Vec<String>>,
}

impl TableChecker {
    /// Creates a checker publishing the given (project, status) pairs.
    pub fn publishing(entries: &[(&str, &str)]) -> Self {
        Self {
            published: entries
                .iter()
                .map(|(project, status)| ((*project).to_string(), (*status).to_string()))
                .collect(),
            queried: Mutex::new(Vec::new()),
        }
    }

    /// Creates a checker that publishes nothing.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl PublicationChecker for TableChecker {
    fn check(&self, project_number: &str) -> Option<PublicationInfo> {
        self.queried.lock().unwrap().push(project_number.to_string());
        self.published.get(project_number).map(|status| PublicationInfo {
            status: status.clone(),
            uuid: format!("uuid-{project_number}"),
        })
    }
}

/// Renderer writing a marker file, or failing when scripted to.
pub struct MarkerRenderer {
    /// When true, every render call fails.
    pub fail: bool,
}

impl MarkerRenderer {
    /// Creates a renderer that succeeds by writing a marker file.
    pub fn working() -> Self {
        Self {
            fail: false,
        }
    }

    /// Creates a renderer that always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
        }
    }
}

impl MapRenderer for MarkerRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<(), RenderError> {
        if self.fail {
            return Err(RenderError::Render("scripted failure".to_string()));
        }
        fs::write(request.output_path, b"artifact")
            .map_err(|err| RenderError::Io(err.to_string()))
    }
}
