//! Pointer normalization.
//!
//! Reduces any raw pointer shape found in upstream credential records to a
//! canonical [`NormalizedPointer`], or nothing. Normalization fails
//! silently: a caller treats `None` as "nothing to resolve", never as an
//! error.

use serde_json::{Map, Value};

use veridoc_core::constants::{
    ARWEAVE_GATEWAY, CID_LINK_KEY, GUARDED_POINTER_KEYS, POINTER_SEARCH_KEYS,
};
use veridoc_core::types::{looks_like_cid, NormalizedPointer};

/// Normalizes a raw pointer value.
///
/// Strings (and stringified scalars) go through the prefix rules; objects
/// and arrays are searched recursively over the fixed key-priority list,
/// first non-empty result wins.
pub fn normalize(raw: &Value) -> Option<NormalizedPointer> {
    match raw {
        Value::String(s) => normalize_str(s),
        Value::Number(n) => normalize_str(&n.to_string()),
        Value::Bool(b) => normalize_str(&b.to_string()),
        Value::Null => None,
        Value::Array(items) => items.iter().find_map(normalize),
        Value::Object(map) => extract_from_object(map),
    }
}

/// Applies the string normalization rules, in order:
///
/// 1. trim; empty → nothing
/// 2. `ar://<id>` → HTTPS Arweave gateway URL
/// 3. `http(s)://…` → passed through unchanged
/// 4. strip `ipfs://` / `/ipfs/` / `ipfs/` prefixes → bare identifier
fn normalize_str(raw: &str) -> Option<NormalizedPointer> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(id) = raw.strip_prefix("ar://") {
        let id = id.trim_start_matches('/');
        if id.is_empty() {
            return None;
        }
        return Some(NormalizedPointer::http(format!("{}/{}", ARWEAVE_GATEWAY, id)));
    }

    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(NormalizedPointer::http(raw));
    }

    let stripped = raw
        .strip_prefix("ipfs://")
        .or_else(|| raw.strip_prefix("/ipfs/"))
        .or_else(|| raw.strip_prefix("ipfs/"))
        .unwrap_or(raw);
    // "ipfs://ipfs/<cid>" shows up in the wild.
    let stripped = stripped.trim_start_matches('/');
    let stripped = stripped.strip_prefix("ipfs/").unwrap_or(stripped);

    if stripped.is_empty() || stripped.contains("://") {
        return None;
    }
    Some(NormalizedPointer::raw_cid(stripped))
}

/// Searches an object for a usable pointer.
///
/// Walks [`POINTER_SEARCH_KEYS`] in priority order, recursing into nested
/// values. `cid`/`hash` fields are only trusted when their value looks like
/// a content identifier or carries an explicit `ipfs://` prefix. The IPLD
/// link convention `{"/": "<cid>"}` is checked last.
fn extract_from_object(map: &Map<String, Value>) -> Option<NormalizedPointer> {
    for key in POINTER_SEARCH_KEYS {
        let Some(value) = map.get(*key) else {
            continue;
        };

        if GUARDED_POINTER_KEYS.contains(key) {
            if let Value::String(s) = value {
                let s = s.trim();
                if looks_like_cid(s) || s.starts_with("ipfs://") {
                    if let Some(ptr) = normalize_str(s) {
                        return Some(ptr);
                    }
                }
            }
            continue;
        }

        if let Some(ptr) = normalize(value) {
            return Some(ptr);
        }
    }

    if let Some(Value::String(cid)) = map.get(CID_LINK_KEY) {
        return normalize_str(cid);
    }

    None
}
