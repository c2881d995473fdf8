// crates/roadwatch-providers/src/publication.rs
// ============================================================================
// Module: Publication Header Checker
// Description: Publication state lookup against the permit register.
// Purpose: Decide whether a pending permit is publicly viewable yet.
// Dependencies: roadwatch-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The register exposes a header endpoint keyed by project number. A
//! response carrying a record identifier means the permit is published; any
//! other outcome, including transient failures, reads as not-yet-published
//! and leaves the entry queued for the next run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use roadwatch_core::PublicationChecker;
use roadwatch_core::PublicationInfo;
use roadwatch_core::SourceError;
use serde::Deserialize;
use serde_json::Value;

use crate::wfs::read_limited;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum header response size in bytes.
const MAX_HEADER_RESPONSE_BYTES: usize = 1024 * 1024;
/// Response key carrying the stable record identifier.
const RECORD_ID_KEY: &str = "uuid";
/// Response key carrying the publication status string.
const STATUS_KEY: &str = "toestand";
/// Status recorded when the register omits one.
const UNKNOWN_STATUS: &str = "unknown";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the publication header checker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublicationCheckConfig {
    /// Endpoint returning project publication headers.
    pub header_url: String,
    /// Base URL for public permit links, sent as the request referer.
    pub link_base: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for PublicationCheckConfig {
    fn default() -> Self {
        Self {
            header_url: String::new(),
            link_base: String::new(),
            timeout_ms: 10_000,
            user_agent: "roadwatch/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Checker Implementation
// ============================================================================

/// Publication checker over the register header endpoint.
pub struct HeaderPublicationChecker {
    /// Checker configuration.
    config: PublicationCheckConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HeaderPublicationChecker {
    /// Creates a new checker with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Setup`] when the configuration is unusable or
    /// the HTTP client cannot be created.
    pub fn new(config: PublicationCheckConfig) -> Result<Self, SourceError> {
        if config.header_url.trim().is_empty() {
            return Err(SourceError::Setup("publication endpoint must be set".to_string()));
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

    /// Attempts the header lookup; any failure yields `None`.
    fn try_check(&self, project_number: &str) -> Option<PublicationInfo> {
        let referer = format!("{}{project_number}", self.config.link_base);
        let response = self
            .client
            .get(&self.config.header_url)
            .query(&[("projectnummer", project_number)])
            .header("Accept", "application/json, text/plain, */*")
            .header("Referer", referer)
            .send()
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body = read_limited(response, MAX_HEADER_RESPONSE_BYTES).ok()?;
        let data: Value = serde_json::from_str(&body).ok()?;
        let uuid = data.get(RECORD_ID_KEY)?.as_str()?.to_string();
        let status = data
            .get(STATUS_KEY)
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_STATUS)
            .to_string();
        Some(PublicationInfo {
            status,
            uuid,
        })
    }
}

impl PublicationChecker for HeaderPublicationChecker {
    fn check(&self, project_number: &str) -> Option<PublicationInfo> {
        self.try_check(project_number)
    }
}
