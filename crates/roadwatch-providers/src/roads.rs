// crates/roadwatch-providers/src/roads.rs
// ============================================================================
// Module: GeoJSON Road Source
// Description: Protected-road inventory loader over a GeoJSON directory.
// Purpose: Load, window, and tag road records for one run.
// Dependencies: roadwatch-core, geo, geojson
// ============================================================================

//! ## Overview
//! The road inventory is a directory of GeoJSON files in the run's planar
//! projection. Every feature overlapping the region bounds becomes a road
//! record tagged with its source file. A file that cannot be read or parsed
//! is skipped and reported in the inventory result; the run fails only when
//! no file yields any data at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use geo::BoundingRect;
use geo::Geometry;
use geojson::FeatureCollection;
use geojson::GeoJson;
use roadwatch_core::AttrValue;
use roadwatch_core::RegionBounds;
use roadwatch_core::RoadInventory;
use roadwatch_core::RoadRecord;
use roadwatch_core::RoadSource;
use roadwatch_core::SOURCE_FILE_KEY;
use roadwatch_core::SourceError;
use roadwatch_core::snapshot_from_json;

// ============================================================================
// SECTION: Road Source
// ============================================================================

/// Road inventory source backed by a directory of GeoJSON files.
#[derive(Debug, Clone)]
pub struct GeoJsonRoadSource {
    /// Directory scanned for `.geojson` files.
    roads_dir: PathBuf,
}

impl GeoJsonRoadSource {
    /// Creates a road source over the given directory.
    #[must_use]
    pub fn new(roads_dir: PathBuf) -> Self {
        Self {
            roads_dir,
        }
    }
}

impl RoadSource for GeoJsonRoadSource {
    fn load(&self, bounds: &RegionBounds) -> Result<RoadInventory, SourceError> {
        let mut paths = inventory_paths(&self.roads_dir)?;
        paths.sort();
        if paths.is_empty() {
            return Err(SourceError::Setup(format!(
                "no road inventory files in {}",
                self.roads_dir.display()
            )));
        }

        let mut inventory = RoadInventory::default();
        for path in &paths {
            match load_file(path, bounds) {
                Ok(mut file_records) => inventory.records.append(&mut file_records),
                Err(err) => inventory.skipped_files.push(err.to_string()),
            }
        }
        if inventory.skipped_files.len() == paths.len() {
            return Err(SourceError::Setup(format!(
                "no road inventory file in {} was readable",
                self.roads_dir.display()
            )));
        }
        Ok(inventory)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Lists the GeoJSON files present in the inventory directory.
fn inventory_paths(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let entries = fs::read_dir(dir).map_err(|err| {
        SourceError::Setup(format!("cannot read road directory {}: {err}", dir.display()))
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| {
            SourceError::Setup(format!("cannot read road directory {}: {err}", dir.display()))
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("geojson")) {
            paths.push(path);
        }
    }
    Ok(paths)
}

/// Loads the road records from one inventory file, windowed to the bounds.
fn load_file(path: &Path, bounds: &RegionBounds) -> Result<Vec<RoadRecord>, SourceError> {
    let content = fs::read_to_string(path)
        .map_err(|err| SourceError::Read(format!("{}: {err}", path.display())))?;
    let geojson: GeoJson = content
        .parse()
        .map_err(|err| SourceError::Read(format!("{}: {err}", path.display())))?;
    let collection = FeatureCollection::try_from(geojson)
        .map_err(|err| SourceError::Read(format!("{}: {err}", path.display())))?;
    let source_tag = source_tag(path);

    let mut records = Vec::new();
    for feature in collection.features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        let Ok(geometry) = Geometry::<f64>::try_from(geometry) else {
            continue;
        };
        let Some(bbox) = geometry.bounding_rect() else {
            continue;
        };
        if !bounds.overlaps(&bbox) {
            continue;
        }
        let mut attributes = snapshot_from_json(feature.properties.unwrap_or_default(), &[]);
        attributes.insert(SOURCE_FILE_KEY.to_string(), AttrValue::Text(source_tag.clone()));
        records.push(RoadRecord {
            geometry,
            attributes,
        });
    }
    Ok(records)
}

/// Derives the source tag recorded on each road from the file name.
fn source_tag(path: &Path) -> String {
    path.file_stem().map_or_else(|| path.display().to_string(), |stem| {
        stem.to_string_lossy().into_owned()
    })
}
