//! Wire contract of the trusted proxy endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON envelope returned by the proxy endpoint.
///
/// Shared between the server (which produces it) and the client fetch
/// pipeline (which consumes it as its first hop). A non-2xx status or
/// `ok: false` is treated as proxy failure and triggers client-side
/// gateway fallback.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEnvelope {
    /// Whether resolution succeeded.
    pub ok: bool,
    /// The URL the payload was fetched from, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_url: Option<String>,
    /// Declared content type of the fetched body, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// The resolved payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure description when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Candidate URLs the caller can try manually when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
}

impl ProxyEnvelope {
    /// Builds a success envelope.
    pub fn success(resolved_url: Option<String>, content_type: Option<String>, data: Value) -> Self {
        Self {
            ok: true,
            resolved_url,
            content_type,
            data: Some(data),
            error: None,
            candidates: None,
        }
    }

    /// Builds a failure envelope, optionally carrying manual-fallback
    /// candidate URLs.
    pub fn failure(error: impl Into<String>, candidates: Option<Vec<String>>) -> Self {
        Self {
            ok: false,
            resolved_url: None,
            content_type: None,
            data: None,
            error: Some(error.into()),
            candidates,
        }
    }
}
