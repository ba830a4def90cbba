//! DTOs for API requests and responses.
//!
//! The resolve endpoint's response body is the shared
//! [`ProxyEnvelope`](veridoc_core::ProxyEnvelope) from `veridoc-core`.

use serde::{Deserialize, Serialize};
use veridoc_core::types::NormalizedPointer;

/// Query parameters for the resolve and candidates endpoints.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// The raw pointer value: a bare CID, `ipfs://…`, `/ipfs/…`, `ar://…`,
    /// or a full URL.
    pub cid: String,
}

/// Response for the candidate-list preview endpoint.
#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    /// The normalized form of the supplied pointer.
    pub pointer: NormalizedPointer,
    /// Candidate URLs in the order the pipeline would try them.
    pub candidates: Vec<String>,
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the service is up.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}
