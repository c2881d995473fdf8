// crates/roadwatch-config/src/config.rs
// ============================================================================
// Module: Roadwatch Configuration
// Description: Configuration loading and validation for Roadwatch.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: roadwatch-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Every
//! field has a default matching the production deployment (Lambert 72 region,
//! the Flemish geodata endpoints, the municipality allow-list), so a missing
//! file yields a fully working configuration while an invalid one fails
//! closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use roadwatch_core::RegionBounds;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "roadwatch.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "ROADWATCH_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Minimum allowed remote timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum allowed remote timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 120_000;
/// Maximum allowed lookback window in days.
pub(crate) const MAX_LOOKBACK_DAYS: u16 = 3_650;
/// Maximum number of jurisdiction allow-list entries.
pub(crate) const MAX_ALLOWED_JURISDICTIONS: usize = 256;
/// Maximum number of permit source layers.
pub(crate) const MAX_PERMIT_LAYERS: usize = 16;
/// Default lookup timeout for single-feature remote queries.
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 10_000;
/// Default fetch timeout for bulk feature downloads.
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Roadwatch monitor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadwatchConfig {
    /// Region of interest in projected coordinates.
    #[serde(default)]
    pub region: RegionConfig,
    /// Jurisdiction lookup and allow-list configuration.
    #[serde(default)]
    pub jurisdiction: JurisdictionConfig,
    /// Permit source configuration.
    #[serde(default)]
    pub permits: PermitsConfig,
    /// Publication register configuration.
    #[serde(default)]
    pub publication: PublicationConfig,
    /// State file and artifact path configuration.
    #[serde(default)]
    pub state: StateConfig,
    /// Intersection pipeline tuning.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for RoadwatchConfig {
    fn default() -> Self {
        Self {
            region: RegionConfig::default(),
            jurisdiction: JurisdictionConfig::default(),
            permits: PermitsConfig::default(),
            publication: PublicationConfig::default(),
            state: StateConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl RoadwatchConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// A missing file at the default location yields the built-in defaults;
    /// an explicitly requested file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path);
        if !resolved.exists() {
            if explicit {
                return Err(ConfigError::Io(format!(
                    "config file not found: {}",
                    resolved.display()
                )));
            }
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.region.validate()?;
        self.jurisdiction.validate()?;
        self.permits.validate()?;
        self.publication.validate()?;
        self.state.validate()?;
        self.pipeline.validate()?;
        Ok(())
    }
}

/// Region of interest in projected (Lambert 72) coordinates.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegionConfig {
    /// Minimum easting of the region.
    #[serde(default = "default_region_min_x")]
    pub min_x: f64,
    /// Minimum northing of the region.
    #[serde(default = "default_region_min_y")]
    pub min_y: f64,
    /// Maximum easting of the region.
    #[serde(default = "default_region_max_x")]
    pub max_x: f64,
    /// Maximum northing of the region.
    #[serde(default = "default_region_max_y")]
    pub max_y: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            min_x: default_region_min_x(),
            min_y: default_region_min_y(),
            max_x: default_region_max_x(),
            max_y: default_region_max_y(),
        }
    }
}

impl RegionConfig {
    /// Returns the region as core bounds.
    #[must_use]
    pub const fn bounds(&self) -> RegionBounds {
        RegionBounds::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Validates that the region is non-degenerate.
    fn validate(&self) -> Result<(), ConfigError> {
        let corners = [self.min_x, self.min_y, self.max_x, self.max_y];
        if corners.iter().any(|value| !value.is_finite()) || !self.bounds().is_well_formed() {
            return Err(ConfigError::Invalid(
                "region bounds must be finite with min strictly below max".to_string(),
            ));
        }
        Ok(())
    }
}

/// Jurisdiction lookup and allow-list configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JurisdictionConfig {
    /// WFS endpoint serving administrative boundaries.
    #[serde(default = "default_jurisdiction_url")]
    pub wfs_url: String,
    /// Feature type queried for point-in-polygon lookups.
    #[serde(default = "default_jurisdiction_layer")]
    pub layer: String,
    /// Feature property carrying the jurisdiction name.
    #[serde(default = "default_jurisdiction_name_property")]
    pub name_property: String,
    /// Jurisdictions for which discoveries are retained.
    #[serde(default = "default_allowed_jurisdictions")]
    pub allowed: Vec<String>,
    /// Timeout for a single lookup request, in milliseconds.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

impl Default for JurisdictionConfig {
    fn default() -> Self {
        Self {
            wfs_url: default_jurisdiction_url(),
            layer: default_jurisdiction_layer(),
            name_property: default_jurisdiction_name_property(),
            allowed: default_allowed_jurisdictions(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl JurisdictionConfig {
    /// Returns the lookup timeout as a duration.
    #[must_use]
    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Validates endpoint, layer, and allow-list settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_url("jurisdiction.wfs_url", &self.wfs_url)?;
        if self.layer.trim().is_empty() {
            return Err(ConfigError::Invalid("jurisdiction.layer must be set".to_string()));
        }
        if self.name_property.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "jurisdiction.name_property must be set".to_string(),
            ));
        }
        if self.allowed.is_empty() {
            return Err(ConfigError::Invalid(
                "jurisdiction.allowed must list at least one jurisdiction".to_string(),
            ));
        }
        if self.allowed.len() > MAX_ALLOWED_JURISDICTIONS {
            return Err(ConfigError::Invalid(
                "jurisdiction.allowed exceeds entry limit".to_string(),
            ));
        }
        if self.allowed.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "jurisdiction.allowed entries must be non-empty".to_string(),
            ));
        }
        validate_timeout("jurisdiction.lookup_timeout_ms", self.lookup_timeout_ms)?;
        Ok(())
    }
}

/// Permit source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PermitsConfig {
    /// WFS endpoint serving permit decision geometry.
    #[serde(default = "default_permits_url")]
    pub wfs_url: String,
    /// Feature layers queried for permits, in order.
    #[serde(default = "default_permit_layers")]
    pub layers: Vec<String>,
    /// Timeout for a bulk feature download, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Days of permit decisions to fetch per run.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u16,
}

impl Default for PermitsConfig {
    fn default() -> Self {
        Self {
            wfs_url: default_permits_url(),
            layers: default_permit_layers(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl PermitsConfig {
    /// Returns the fetch timeout as a duration.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Validates endpoint, layer, and window settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_url("permits.wfs_url", &self.wfs_url)?;
        if self.layers.is_empty() {
            return Err(ConfigError::Invalid(
                "permits.layers must list at least one layer".to_string(),
            ));
        }
        if self.layers.len() > MAX_PERMIT_LAYERS {
            return Err(ConfigError::Invalid("permits.layers exceeds entry limit".to_string()));
        }
        if self.layers.iter().any(|layer| layer.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "permits.layers entries must be non-empty".to_string(),
            ));
        }
        validate_timeout("permits.fetch_timeout_ms", self.fetch_timeout_ms)?;
        if self.lookback_days == 0 || self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::Invalid(format!(
                "permits.lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}"
            )));
        }
        Ok(())
    }
}

/// Publication register configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicationConfig {
    /// Endpoint returning project publication headers.
    #[serde(default = "default_publication_header_url")]
    pub header_url: String,
    /// Base URL for public permit links, joined with the project number.
    #[serde(default = "default_publication_link_base")]
    pub link_base: String,
    /// Timeout for a single publication check, in milliseconds.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            header_url: default_publication_header_url(),
            link_base: default_publication_link_base(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl PublicationConfig {
    /// Returns the lookup timeout as a duration.
    #[must_use]
    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Validates endpoint and link settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_url("publication.header_url", &self.header_url)?;
        validate_url("publication.link_base", &self.link_base)?;
        if !self.link_base.ends_with('/') {
            return Err(ConfigError::Invalid(
                "publication.link_base must end with '/'".to_string(),
            ));
        }
        validate_timeout("publication.lookup_timeout_ms", self.lookup_timeout_ms)?;
        Ok(())
    }
}

/// State file and artifact path configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Directory holding protected-road geometry files.
    #[serde(default = "default_roads_dir")]
    pub roads_dir: PathBuf,
    /// Directory receiving match artifacts and the matches store.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Path of the pending-intersection queue file.
    #[serde(default = "default_pending_file")]
    pub pending_file: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            roads_dir: default_roads_dir(),
            output_dir: default_output_dir(),
            pending_file: default_pending_file(),
        }
    }
}

impl StateConfig {
    /// Returns the path of the matches store inside the output directory.
    #[must_use]
    pub fn matches_path(&self) -> PathBuf {
        self.output_dir.join("matches.json")
    }

    /// Validates that no state path is empty.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.roads_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("state.roads_dir must be set".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("state.output_dir must be set".to_string()));
        }
        if self.pending_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("state.pending_file must be set".to_string()));
        }
        Ok(())
    }
}

/// Intersection pipeline tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Inward erosion distance applied to permit footprints, in map units.
    #[serde(default = "default_erosion_tolerance")]
    pub erosion_tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            erosion_tolerance: default_erosion_tolerance(),
        }
    }
}

impl PipelineConfig {
    /// Validates pipeline tuning values.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.erosion_tolerance.is_finite() || self.erosion_tolerance <= 0.0 {
            return Err(ConfigError::Invalid(
                "pipeline.erosion_tolerance must be a positive finite number".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
///
/// Returns the path and whether it was requested explicitly.
fn resolve_path(path: Option<&Path>) -> (PathBuf, bool) {
    if let Some(path) = path {
        return (path.to_path_buf(), true);
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        return (PathBuf::from(env_path), true);
    }
    (PathBuf::from(DEFAULT_CONFIG_NAME), false)
}

/// Validates a timeout value against the shared bounds.
fn validate_timeout(field: &str, value_ms: u64) -> Result<(), ConfigError> {
    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value_ms) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
        )));
    }
    Ok(())
}

/// Validates that a field holds an absolute http(s) URL.
fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(value)
        .map_err(|err| ConfigError::Invalid(format!("{field} is not a valid URL: {err}")))?;
    if parsed.scheme() != "https" && parsed.scheme() != "http" {
        return Err(ConfigError::Invalid(format!("{field} must use http or https")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default minimum easting (Lambert 72).
const fn default_region_min_x() -> f64 {
    77_144.0
}

/// Default minimum northing (Lambert 72).
const fn default_region_min_y() -> f64 {
    158_145.0
}

/// Default maximum easting (Lambert 72).
const fn default_region_max_x() -> f64 {
    127_271.0
}

/// Default maximum northing (Lambert 72).
const fn default_region_max_y() -> f64 {
    200_742.0
}

/// Default administrative boundary WFS endpoint.
fn default_jurisdiction_url() -> String {
    "https://geo.api.vlaanderen.be/VRBG/wfs".to_string()
}

/// Default administrative boundary feature type.
fn default_jurisdiction_layer() -> String {
    "VRBG:Refgem".to_string()
}

/// Default property carrying the jurisdiction name.
fn default_jurisdiction_name_property() -> String {
    "NAAM".to_string()
}

/// Default jurisdiction allow-list for the monitored region.
fn default_allowed_jurisdictions() -> Vec<String> {
    [
        "Anzegem",
        "Avelgem",
        "Brakel",
        "Deinze",
        "Gavere",
        "Geraardsbergen",
        "Horebeke",
        "Kluisbergen",
        "Kruisem",
        "Lierde",
        "Maarkedal",
        "Nazareth-De Pinte",
        "Oudenaarde",
        "Ronse",
        "Waregem",
        "Wortegem-Petegem",
        "Zottegem",
        "Zulte",
        "Zwalm",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Default permit decision WFS endpoint.
fn default_permits_url() -> String {
    "https://www.mercator.vlaanderen.be/raadpleegdienstenmercatorpubliek/wfs".to_string()
}

/// Default permit layers, queried in order.
fn default_permit_layers() -> Vec<String> {
    vec!["lu:lu_omv_gd_v2".to_string(), "lu:lu_omv_vk_v2".to_string()]
}

/// Default publication header endpoint.
fn default_publication_header_url() -> String {
    "https://omgevingsloketinzage.omgeving.vlaanderen.be/proxy-omv-up/rs/v1/inzage/projecten/header"
        .to_string()
}

/// Default base URL for public permit links.
fn default_publication_link_base() -> String {
    "https://omgevingsloketinzage.omgeving.vlaanderen.be/".to_string()
}

/// Default roads directory.
fn default_roads_dir() -> PathBuf {
    PathBuf::from("roads")
}

/// Default output directory.
fn default_output_dir() -> PathBuf {
    PathBuf::from("output_maps")
}

/// Default pending queue file.
fn default_pending_file() -> PathBuf {
    PathBuf::from("pending_intersections.json")
}

/// Default lookup timeout in milliseconds.
const fn default_lookup_timeout_ms() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_MS
}

/// Default fetch timeout in milliseconds.
const fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

/// Default permit lookback window in days.
const fn default_lookback_days() -> u16 {
    100
}

/// Default permit erosion tolerance in map units.
const fn default_erosion_tolerance() -> f64 {
    1.0
}
