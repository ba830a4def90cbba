//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;
use tracing::{debug, info};

use veridoc_core::error::VeridocError;
use veridoc_core::types::ProxyEnvelope;
use veridoc_resolve::{candidates, normalize};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/v1/metadata/resolve?cid=...
///
/// Resolves a pointer server-side and returns the envelope. Exhaustion is
/// reported as `ok: false` with the attempted candidate URLs so the client
/// can render manual fallback links; an unusable pointer is a 400.
pub async fn resolve_metadata(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ProxyEnvelope>> {
    let pointer = normalize(&Value::String(query.cid.clone())).ok_or_else(|| {
        ApiError::bad_request(format!("No usable pointer in '{}'", query.cid))
    })?;

    match state.resolver.resolve_pointer(&pointer).await {
        Ok(meta) => {
            info!(pointer = %pointer.value, resolved_url = ?meta.resolved_url, "Resolved metadata");
            let content_type = envelope_content_type(&meta.data);
            Ok(Json(ProxyEnvelope::success(
                meta.resolved_url,
                content_type,
                meta.data,
            )))
        }
        Err(VeridocError::GatewaysExhausted { pointer, attempted }) => {
            debug!(pointer = %pointer, tried = attempted.len(), "Gateways exhausted");
            Ok(Json(ProxyEnvelope::failure(
                format!("all gateways exhausted for '{}'", pointer),
                Some(attempted),
            )))
        }
        Err(err) => Err(ApiError::from(err)),
    }
}

/// GET /api/v1/metadata/candidates?cid=...
pub async fn list_candidates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<CandidatesResponse>> {
    let pointer = normalize(&Value::String(query.cid.clone())).ok_or_else(|| {
        ApiError::bad_request(format!("No usable pointer in '{}'", query.cid))
    })?;

    let candidates = candidates(&pointer, &state.resolver.config().gateways);

    Ok(Json(CandidatesResponse {
        pointer,
        candidates,
    }))
}

/// Declares the envelope's content type from the payload shape: a body the
/// pipeline wrapped under a lone `content` key was raw text, anything else
/// is JSON.
fn envelope_content_type(data: &Value) -> Option<String> {
    let wrapped_text = data
        .as_object()
        .map(|obj| obj.len() == 1 && obj.get("content").map(Value::is_string) == Some(true))
        .unwrap_or(false);

    if wrapped_text {
        Some("text/plain".into())
    } else {
        Some("application/json".into())
    }
}
