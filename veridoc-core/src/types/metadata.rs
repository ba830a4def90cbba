//! Resolved metadata records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `{trait_type, value}` entry from a metadata record's attributes list.
///
/// Upstream records spell the key either `trait_type` or `traitType`; both
/// are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// The attribute's display label (e.g. "Issuing Institution").
    #[serde(rename = "trait_type", alias = "traitType")]
    pub trait_type: String,
    /// The attribute's value; any JSON scalar or structure.
    pub value: Value,
}

/// The outcome of a successful metadata resolution.
///
/// Created fresh per resolution attempt and replaced wholesale on the next
/// one; never cached across calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    /// The URL the payload was actually fetched from. `None` when the
    /// trusted proxy returned the payload without disclosing its source.
    pub resolved_url: Option<String>,
    /// The resolved payload: parsed JSON, or `{"content": "<raw text>"}`
    /// when the body was not JSON.
    pub data: Value,
    /// The record's attributes list, empty when absent or malformed.
    pub attributes: Vec<Attribute>,
}

impl ResolvedMetadata {
    /// Builds a record from a fetched payload, pulling out the attributes
    /// list when present and well-formed.
    pub fn from_value(resolved_url: Option<String>, data: Value) -> Self {
        let attributes = data
            .get("attributes")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            resolved_url,
            data,
            attributes,
        }
    }

    /// The record's display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.data.get("name").and_then(Value::as_str)
    }

    /// The record's description, if any.
    pub fn description(&self) -> Option<&str> {
        self.data.get("description").and_then(Value::as_str)
    }
}
