// crates/roadwatch-render/src/leaflet.rs
// ============================================================================
// Module: Leaflet Map Renderer
// Description: Interactive HTML map artifact for one confirmed match.
// Purpose: Implement the map renderer interface over a Leaflet document.
// Dependencies: roadwatch-core, geo, geojson, serde_json
// ============================================================================

//! ## Overview
//! The renderer writes one HTML document per match: an OpenStreetMap base
//! layer centered on the permit, the permit footprint with its attribute
//! table as a popup, one colored layer per intersecting road, and the
//! configured WMS reference overlays, all toggleable from a layer control.
//! Geometry is reprojected from the planar analysis projection to degrees
//! before serialization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use geo::Centroid;
use geo::Coord;
use geo::Geometry;
use geo::MapCoords;
use geo::Polygon;
use roadwatch_core::AttrMap;
use roadwatch_core::AttrValue;
use roadwatch_core::MapRenderer;
use roadwatch_core::RenderError;
use roadwatch_core::RenderRequest;

use crate::projection::lambert72_to_wgs84;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Leaflet stylesheet location.
const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
/// Leaflet script location.
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
/// Base tile layer template.
const BASE_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
/// Fill and stroke color of the permit footprint layer.
const PERMIT_COLOR: &str = "#ff7800";

// ============================================================================
// SECTION: Options
// ============================================================================

/// One toggleable WMS reference overlay.
#[derive(Debug, Clone)]
pub struct WmsOverlay {
    /// Name shown in the layer control.
    pub name: String,
    /// WMS service URL.
    pub url: String,
    /// WMS layer name requested from the service.
    pub layers: String,
    /// Attribution line shown on the map.
    pub attribution: String,
}

/// Rendering options for the Leaflet artifact.
#[derive(Debug, Clone)]
pub struct LeafletRenderOptions {
    /// Initial zoom level of the map.
    pub zoom: u8,
    /// Reference overlays offered in the layer control, hidden by default.
    pub overlays: Vec<WmsOverlay>,
    /// Stroke colors cycled across road layers.
    pub road_colors: Vec<String>,
}

impl Default for LeafletRenderOptions {
    fn default() -> Self {
        Self {
            zoom: 17,
            overlays: vec![
                WmsOverlay {
                    name: "Atlas der Buurtwegen (1841)".to_string(),
                    url: "https://geoservices.informatievlaanderen.be/overdrachtdienst/AtlasBuurtwegen/wms".to_string(),
                    layers: "AtlasBuurtwegen".to_string(),
                    attribution: "© Digitaal Vlaanderen".to_string(),
                },
                WmsOverlay {
                    name: "Luchtfoto (Vlaanderen)".to_string(),
                    url: "https://geo.api.vlaanderen.be/Luchtfoto/wms".to_string(),
                    layers: "Luchtfoto".to_string(),
                    attribution: "© Digitaal Vlaanderen".to_string(),
                },
            ],
            road_colors: ["blue", "purple", "green", "orange", "red"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Map renderer producing self-contained Leaflet HTML documents.
#[derive(Debug, Clone, Default)]
pub struct LeafletMapRenderer {
    /// Rendering options.
    options: LeafletRenderOptions,
}

impl LeafletMapRenderer {
    /// Creates a renderer with the given options.
    #[must_use]
    pub const fn new(options: LeafletRenderOptions) -> Self {
        Self {
            options,
        }
    }
}

impl MapRenderer for LeafletMapRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<(), RenderError> {
        let document = self.compose(request)?;
        if let Some(parent) = request.output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| RenderError::Io(err.to_string()))?;
        }
        fs::write(request.output_path, document).map_err(|err| RenderError::Io(err.to_string()))
    }
}

impl LeafletMapRenderer {
    /// Composes the full HTML document for one match.
    fn compose(&self, request: &RenderRequest<'_>) -> Result<String, RenderError> {
        let center = permit_center(request.permit_geometry)?;
        let permit_json = geometry_json(&Geometry::Polygon(request.permit_geometry.clone()))?;
        let permit_popup = popup_literal(request.permit_data, "Permit")?;

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\"/>\n");
        html.push_str(&format!("<link rel=\"stylesheet\" href=\"{LEAFLET_CSS}\"/>\n"));
        html.push_str(&format!("<script src=\"{LEAFLET_JS}\"></script>\n"));
        html.push_str("<style>html, body, #map { height: 100%; margin: 0; }</style>\n");
        html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n<script>\n");

        html.push_str(&format!(
            "var map = L.map('map').setView([{}, {}], {});\n",
            center.0, center.1, self.options.zoom
        ));
        html.push_str(&format!(
            "L.tileLayer('{BASE_TILES}', {{attribution: '&copy; OpenStreetMap contributors'}}).addTo(map);\n"
        ));

        html.push_str(&format!(
            "var permitLayer = L.geoJSON({permit_json}, {{style: {{color: '{PERMIT_COLOR}', fillColor: '{PERMIT_COLOR}', fillOpacity: 0.4}}}}).bindPopup({permit_popup}).addTo(map);\n"
        ));

        html.push_str("var featureLayers = {'Permit': permitLayer};\n");
        for (index, (geometry, data)) in
            request.road_geometries.iter().zip(request.road_data_list).enumerate()
        {
            let label = format!("Road {}", index + 1);
            let color = self.road_color(index);
            let road_json = geometry_json(geometry)?;
            let road_popup = popup_literal(data, &label)?;
            html.push_str(&format!(
                "var roadLayer{index} = L.geoJSON({road_json}, {{style: {{color: '{color}', weight: 5}}}}).bindPopup({road_popup}).addTo(map);\n"
            ));
            html.push_str(&format!("featureLayers['{label}'] = roadLayer{index};\n"));
        }

        html.push_str("var overlayLayers = {};\n");
        for overlay in &self.options.overlays {
            let name = js_string(&overlay.name)?;
            html.push_str(&format!(
                "overlayLayers[{name}] = L.tileLayer.wms('{}', {{layers: '{}', format: 'image/png', transparent: true, attribution: '{}'}});\n",
                overlay.url, overlay.layers, overlay.attribution
            ));
        }

        html.push_str(
            "L.control.layers(null, Object.assign({}, featureLayers, overlayLayers)).addTo(map);\n",
        );
        html.push_str("</script>\n</body>\n</html>\n");
        Ok(html)
    }

    /// Returns the stroke color for the road layer at `index`.
    fn road_color(&self, index: usize) -> &str {
        if self.options.road_colors.is_empty() {
            return "blue";
        }
        let slot = index % self.options.road_colors.len();
        self.options.road_colors.get(slot).map_or("blue", String::as_str)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Computes the display center of the permit footprint in degrees.
fn permit_center(footprint: &Polygon<f64>) -> Result<(f64, f64), RenderError> {
    let centroid = footprint
        .centroid()
        .ok_or_else(|| RenderError::Render("permit footprint has no centroid".to_string()))?;
    Ok(lambert72_to_wgs84(centroid.x(), centroid.y()))
}

/// Reprojects a geometry to degrees and serializes it as GeoJSON.
fn geometry_json(geometry: &Geometry<f64>) -> Result<String, RenderError> {
    let reprojected = geometry.map_coords(|coord: Coord<f64>| {
        let (lat, lon) = lambert72_to_wgs84(coord.x, coord.y);
        Coord {
            x: lon,
            y: lat,
        }
    });
    let encoded = geojson::Geometry::new(geojson::Value::from(&reprojected));
    serde_json::to_string(&encoded).map_err(|err| RenderError::Render(err.to_string()))
}

/// Builds the popup attribute table as a JavaScript string literal.
fn popup_literal(data: &AttrMap, title: &str) -> Result<String, RenderError> {
    let mut table = format!(
        "<h4>{}</h4><table style='width:100%; border-collapse: collapse; font-family: sans-serif; font-size: 12px;'>",
        escape_html(title)
    );
    for (key, value) in data {
        let rendered = display_value(value)?;
        let cell = if rendered.starts_with("http") {
            format!(
                "<a href='{0}' target='_blank' style='font-weight: bold; text-decoration: underline;'>{0}</a>",
                escape_html(&rendered)
            )
        } else {
            escape_html(&rendered)
        };
        table.push_str(&format!(
            "<tr style='border-bottom: 1px solid #ddd;'><td style='padding: 4px; font-weight: bold;'>{}</td><td style='padding: 4px;'>{cell}</td></tr>",
            escape_html(key)
        ));
    }
    table.push_str("</table>");
    js_string(&table)
}

/// Renders an attribute scalar for display.
fn display_value(value: &AttrValue) -> Result<String, RenderError> {
    let json = serde_json::to_value(value).map_err(|err| RenderError::Render(err.to_string()))?;
    Ok(match json {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Encodes text as a JavaScript string literal.
fn js_string(text: &str) -> Result<String, RenderError> {
    serde_json::to_string(text).map_err(|err| RenderError::Render(err.to_string()))
}

/// Escapes text for embedding in HTML markup.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
