// crates/roadwatch-core/src/core/attributes.rs
// ============================================================================
// Module: Roadwatch Attribute Model
// Description: Tagged scalar values and ordered attribute mappings.
// Purpose: Keep per-source attribute snapshots language-neutral and serializable.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Upstream geodata carries arbitrary per-source columns. Roadwatch models
//! them as an ordered mapping from string key to a tagged scalar so that
//! pending and matched snapshots round-trip through JSON without depending on
//! any particular geodata library. Geometry columns are never stored here;
//! geometries are serialized separately as well-known text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Attribute Map
// ============================================================================

/// Ordered attribute mapping from column name to scalar value.
pub type AttrMap = BTreeMap<String, AttrValue>;

// ============================================================================
// SECTION: Attribute Value
// ============================================================================

/// Tagged scalar attribute value.
///
/// # Invariants
/// - Serializes to plain JSON scalars; timestamps serialize as RFC 3339
///   strings so snapshots stay readable and stable across versions.
/// - Deserialization prefers the most specific variant: a string that parses
///   as RFC 3339 becomes a [`AttrValue::Timestamp`], anything else text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Absent or upstream-null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Timestamp value, serialized as an RFC 3339 string.
    Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime),
    /// Free-form text value.
    Text(String),
}

impl AttrValue {
    /// Returns the text content when the value is textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Converts an arbitrary JSON value into an attribute scalar.
    ///
    /// Strings that parse as RFC 3339 become timestamps. Arrays and objects
    /// have no scalar representation and are flattened to their JSON text.
    /// Non-finite numbers normalize to null, matching upstream NaN handling.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => number.as_i64().map_or_else(
                || match number.as_f64() {
                    Some(float) if float.is_finite() => Self::Float(float),
                    _ => Self::Null,
                },
                Self::Int,
            ),
            serde_json::Value::String(text) => OffsetDateTime::parse(&text, &Rfc3339)
                .map_or(Self::Text(text), Self::Timestamp),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Text(other.to_string())
            }
        }
    }
}

// ============================================================================
// SECTION: Snapshot Helpers
// ============================================================================

/// Builds an attribute snapshot from JSON properties, excluding the named
/// geometry columns.
#[must_use]
pub fn snapshot_from_json(
    properties: serde_json::Map<String, serde_json::Value>,
    exclude: &[&str],
) -> AttrMap {
    properties
        .into_iter()
        .filter(|(key, _)| !exclude.contains(&key.as_str()))
        .map(|(key, value)| (key, AttrValue::from_json(value)))
        .collect()
}
