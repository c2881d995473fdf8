// crates/roadwatch-providers/src/jurisdiction.rs
// ============================================================================
// Module: WFS Jurisdiction Resolver
// Description: Point-in-polygon jurisdiction lookup over a boundary WFS.
// Purpose: Resolve the jurisdiction containing a permit centroid.
// Dependencies: roadwatch-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The resolver queries an administrative-boundary WFS with a point
//! intersection filter and extracts the name property of the first matching
//! feature. Any failure, from network errors to a missing property, degrades
//! to the unknown jurisdiction; the discovery stage then skips the permit
//! without aborting the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use geo::Point;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use roadwatch_core::JurisdictionResolver;
use roadwatch_core::SourceError;
use roadwatch_core::UNKNOWN_JURISDICTION;
use serde::Deserialize;
use serde_json::Value;

use crate::wfs::read_limited;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum boundary lookup response size in bytes.
const MAX_LOOKUP_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the WFS jurisdiction resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JurisdictionLookupConfig {
    /// WFS endpoint serving administrative boundaries.
    pub endpoint: String,
    /// Feature type queried for point-in-polygon lookups.
    pub layer: String,
    /// Feature property carrying the jurisdiction name.
    pub name_property: String,
    /// Geometry property used in the intersection filter.
    pub geometry_property: String,
    /// Spatial reference of submitted points.
    pub srs_name: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for JurisdictionLookupConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            layer: String::new(),
            name_property: "NAAM".to_string(),
            geometry_property: "SHAPE".to_string(),
            srs_name: "EPSG:31370".to_string(),
            timeout_ms: 10_000,
            user_agent: "roadwatch/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Resolver Implementation
// ============================================================================

/// Jurisdiction resolver over an administrative-boundary WFS.
pub struct WfsJurisdictionResolver {
    /// Resolver configuration.
    config: JurisdictionLookupConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl WfsJurisdictionResolver {
    /// Creates a new resolver with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Setup`] when the configuration is unusable or
    /// the HTTP client cannot be created.
    pub fn new(config: JurisdictionLookupConfig) -> Result<Self, SourceError> {
        if config.endpoint.trim().is_empty() {
            return Err(SourceError::Setup("jurisdiction endpoint must be set".to_string()));
        }
        if config.layer.trim().is_empty() {
            return Err(SourceError::Setup("jurisdiction layer must be set".to_string()));
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

    /// Attempts the lookup; any failure yields `None`.
    fn try_resolve(&self, location: Point<f64>) -> Option<String> {
        let filter = format!(
            "INTERSECTS({}, POINT({} {}))",
            self.config.geometry_property,
            location.x(),
            location.y()
        );
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("service", "WFS"),
                ("version", "1.1.0"),
                ("request", "GetFeature"),
                ("typeName", self.config.layer.as_str()),
                ("outputFormat", "application/json"),
                ("srsName", self.config.srs_name.as_str()),
                ("CQL_FILTER", filter.as_str()),
                ("propertyName", self.config.name_property.as_str()),
                ("maxFeatures", "1"),
            ])
            .send()
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body = read_limited(response, MAX_LOOKUP_RESPONSE_BYTES).ok()?;
        let data: Value = serde_json::from_str(&body).ok()?;
        let name = data
            .get("features")?
            .get(0)?
            .get("properties")?
            .get(self.config.name_property.as_str())?
            .as_str()?;
        Some(name.to_string())
    }
}

impl JurisdictionResolver for WfsJurisdictionResolver {
    fn resolve(&self, location: Point<f64>) -> String {
        self.try_resolve(location)
            .unwrap_or_else(|| UNKNOWN_JURISDICTION.to_string())
    }
}
