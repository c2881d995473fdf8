// crates/roadwatch-providers/src/wfs.rs
// ============================================================================
// Module: WFS Permit Source
// Description: Permit candidate fetcher over a WFS GetFeature endpoint.
// Purpose: Pull recently filed permit footprints windowed to the region.
// Dependencies: roadwatch-core, geo, geojson, reqwest
// ============================================================================

//! ## Overview
//! Permit decisions are served as GeoJSON feature collections from a WFS
//! endpoint, one layer per decision type. Each layer is queried with a
//! bounding-box and filing-date filter; a layer that fails degrades to an
//! empty contribution and only a run where every layer fails is fatal. Some
//! deployments name the geometry property `geom`, others `geometry`, so a
//! rejected filter is retried once with the alternate name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::io::Read;
use std::time::Duration;

use geo::Area;
use geo::Geometry;
use geo::Polygon;
use geojson::FeatureCollection;
use geojson::GeoJson;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use roadwatch_core::PermitCandidate;
use roadwatch_core::PermitSource;
use roadwatch_core::RegionBounds;
use roadwatch_core::SourceError;
use roadwatch_core::snapshot_from_json;
use serde::Deserialize;
use time::Date;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Geometry property name tried first in the date/bbox filter.
const PRIMARY_GEOMETRY_PROPERTY: &str = "geom";
/// Geometry property name used when the primary one is rejected.
const FALLBACK_GEOMETRY_PROPERTY: &str = "geometry";
/// Upstream marker for a rejected geometry property name.
const ILLEGAL_PROPERTY_MARKER: &str = "Illegal property name: geom";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the WFS permit source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WfsPermitConfig {
    /// WFS endpoint serving permit decision layers.
    pub endpoint: String,
    /// Feature layers queried in order.
    pub layers: Vec<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Attribute property carrying the filing date, used in the filter.
    pub filing_date_property: String,
    /// Spatial reference requested from the endpoint.
    pub srs_name: String,
}

impl Default for WfsPermitConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            layers: Vec::new(),
            timeout_ms: 30_000,
            max_response_bytes: 32 * 1024 * 1024,
            user_agent: "roadwatch/0.1".to_string(),
            filing_date_property: "datum_indiening".to_string(),
            srs_name: "EPSG:31370".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Permit Source
// ============================================================================

/// Permit source over a WFS GetFeature endpoint.
pub struct WfsPermitSource {
    /// Source configuration, including layers and limits.
    config: WfsPermitConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl WfsPermitSource {
    /// Creates a new WFS permit source with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Setup`] when the configuration is unusable or
    /// the HTTP client cannot be created.
    pub fn new(config: WfsPermitConfig) -> Result<Self, SourceError> {
        if config.endpoint.trim().is_empty() {
            return Err(SourceError::Setup("permit endpoint must be set".to_string()));
        }
        if config.layers.is_empty() {
            return Err(SourceError::Setup("permit layers must be set".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| SourceError::Setup("http client build failed".to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Queries one layer, retrying once with the fallback geometry property.
    fn fetch_layer(
        &self,
        layer: &str,
        bounds: &RegionBounds,
        cutoff: &str,
    ) -> Result<Vec<PermitCandidate>, SourceError> {
        let filter = self.cql_filter(PRIMARY_GEOMETRY_PROPERTY, bounds, cutoff);
        let mut body = self.request_layer(layer, &filter)?;
        if body.contains(ILLEGAL_PROPERTY_MARKER) {
            let filter = self.cql_filter(FALLBACK_GEOMETRY_PROPERTY, bounds, cutoff);
            body = self.request_layer(layer, &filter)?;
        }
        parse_candidates(&body, layer)
    }

    /// Issues one GetFeature request and returns the bounded response body.
    fn request_layer(&self, layer: &str, filter: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("service", "WFS"),
                ("version", "1.1.0"),
                ("request", "GetFeature"),
                ("typeName", layer),
                ("outputFormat", "application/json"),
                ("srsName", self.config.srs_name.as_str()),
                ("CQL_FILTER", filter),
            ])
            .send()
            .map_err(|err| SourceError::Read(format!("layer {layer}: {err}")))?;
        if !response.status().is_success() {
            return Err(SourceError::Read(format!(
                "layer {layer}: status {}",
                response.status().as_u16()
            )));
        }
        read_limited(response, self.config.max_response_bytes)
            .map_err(|message| SourceError::Read(format!("layer {layer}: {message}")))
    }

    /// Builds the combined bounding-box and filing-date filter.
    fn cql_filter(&self, geometry_property: &str, bounds: &RegionBounds, cutoff: &str) -> String {
        format!(
            "BBOX({geometry_property}, {}, {}, {}, {}) AND {} >= {cutoff}",
            bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y, self.config.filing_date_property
        )
    }
}

impl PermitSource for WfsPermitSource {
    fn fetch(
        &self,
        bounds: &RegionBounds,
        since: Date,
    ) -> Result<Vec<PermitCandidate>, SourceError> {
        let cutoff = format!(
            "{:04}-{:02}-{:02}T00:00:00Z",
            since.year(),
            u8::from(since.month()),
            since.day()
        );
        let mut candidates = Vec::new();
        let mut failures = Vec::new();
        for layer in &self.config.layers {
            match self.fetch_layer(layer, bounds, &cutoff) {
                Ok(mut layer_candidates) => candidates.append(&mut layer_candidates),
                Err(err) => failures.push(err.to_string()),
            }
        }
        if failures.len() == self.config.layers.len() {
            return Err(SourceError::Setup(format!(
                "all permit layers failed: {}",
                failures.join("; ")
            )));
        }
        Ok(candidates)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a GeoJSON response body into permit candidates.
fn parse_candidates(body: &str, layer: &str) -> Result<Vec<PermitCandidate>, SourceError> {
    let geojson: GeoJson =
        body.parse().map_err(|err| SourceError::Read(format!("layer {layer}: {err}")))?;
    let collection = FeatureCollection::try_from(geojson)
        .map_err(|err| SourceError::Read(format!("layer {layer}: {err}")))?;

    let mut candidates = Vec::new();
    for feature in collection.features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        let Ok(geometry) = Geometry::<f64>::try_from(geometry) else {
            continue;
        };
        let Some(footprint) = footprint_polygon(geometry) else {
            continue;
        };
        let attributes = snapshot_from_json(feature.properties.unwrap_or_default(), &[]);
        candidates.push(PermitCandidate {
            geometry: footprint,
            attributes,
        });
    }
    Ok(candidates)
}

/// Extracts the polygon footprint from a permit geometry.
///
/// Multi-part footprints keep their largest part; non-areal geometries are
/// dropped.
fn footprint_polygon(geometry: Geometry<f64>) -> Option<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Some(polygon),
        Geometry::MultiPolygon(multi) => multi.into_iter().max_by(|left, right| {
            left.unsigned_area().partial_cmp(&right.unsigned_area()).unwrap_or(Ordering::Equal)
        }),
        _ => None,
    }
}

/// Reads a response body while enforcing a byte limit.
pub(crate) fn read_limited(response: Response, max_bytes: usize) -> Result<String, String> {
    let max_bytes_u64 =
        u64::try_from(max_bytes).map_err(|_| "response size limit exceeds u64".to_string())?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err("response exceeds size limit".to_string());
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle.read_to_end(&mut buf).map_err(|err| format!("failed to read response: {err}"))?;
    if buf.len() > max_bytes {
        return Err("response exceeds size limit".to_string());
    }
    String::from_utf8(buf).map_err(|_| "response must be utf-8".to_string())
}
