//! Normalized metadata pointers.

use serde::{Deserialize, Serialize};

use crate::constants::{CIDV0_LENGTH, CIDV1_MIN_LENGTH};

/// Scheme of a normalized pointer.
///
/// `ar://` pointers are rewritten to their HTTPS gateway equivalent during
/// normalization, so they surface here as [`PointerScheme::Http`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerScheme {
    /// A fully qualified `http(s)` URL; fetched as-is, exactly one candidate.
    Http,
    /// A bare content identifier (plus optional path), expanded into
    /// per-gateway candidate URLs. Never carries a protocol prefix.
    RawCid,
}

/// A raw metadata pointer reduced to a canonical, fetchable form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPointer {
    /// How the value should be turned into candidate URLs.
    pub scheme: PointerScheme,
    /// The URL (for `Http`) or bare `<cid>[/<path>]` (for `RawCid`).
    pub value: String,
}

impl NormalizedPointer {
    /// Creates an `Http` pointer.
    pub fn http(value: impl Into<String>) -> Self {
        Self {
            scheme: PointerScheme::Http,
            value: value.into(),
        }
    }

    /// Creates a `RawCid` pointer.
    ///
    /// The value must already be stripped of `ipfs://` / `/ipfs/` prefixes;
    /// normalization guarantees this.
    pub fn raw_cid(value: impl Into<String>) -> Self {
        let value = value.into();
        debug_assert!(!value.contains("://"), "raw-cid must have no scheme");
        Self {
            scheme: PointerScheme::RawCid,
            value,
        }
    }

    /// Returns true for `Http` pointers.
    pub fn is_http(&self) -> bool {
        self.scheme == PointerScheme::Http
    }

    /// Splits a `RawCid` value into its leading identifier and remaining
    /// path (the path keeps its leading slash, or is empty).
    pub fn cid_and_path(&self) -> (&str, &str) {
        match self.value.find('/') {
            Some(idx) => self.value.split_at(idx),
            None => (self.value.as_str(), ""),
        }
    }
}

/// Returns true if a string looks like a known content-identifier shape.
///
/// Accepts base58 CIDv0 ("Qm…", exactly 46 chars) and base32 CIDv1
/// ("bafy…"/"bafk…", at least 50 chars). Used to guard `cid`/`hash` record
/// fields that often hold unrelated hashes.
pub fn looks_like_cid(value: &str) -> bool {
    if value.starts_with("Qm") {
        return value.len() == CIDV0_LENGTH && value.chars().all(|c| c.is_ascii_alphanumeric());
    }
    if value.starts_with("bafy") || value.starts_with("bafk") {
        return value.len() >= CIDV1_MIN_LENGTH
            && value.chars().all(|c| c.is_ascii_alphanumeric());
    }
    false
}
