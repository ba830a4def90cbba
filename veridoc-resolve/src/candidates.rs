//! Candidate URL expansion.
//!
//! Expands a normalized pointer into the ordered list of URLs the fetch
//! pipeline will try. The sequence is deterministic for a given pointer and
//! gateway list, so fallback behavior is reproducible and testable by
//! asserting the exact URL order.

use serde::{Deserialize, Serialize};

use veridoc_core::constants::DEFAULT_GATEWAYS;
use veridoc_core::types::NormalizedPointer;

/// One configured gateway mirror.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayEndpoint {
    /// Hostname (`ipfs.io`), or a scheme-qualified base
    /// (`http://127.0.0.1:8080`) for private mirrors.
    pub host: String,
    /// Whether the gateway also serves `<cid>.ipfs.<host>` subdomain-style
    /// requests. Ignored for scheme-qualified bases, where the CID cannot
    /// be spliced into the authority.
    pub subdomain: bool,
}

impl GatewayEndpoint {
    /// Creates a path-style-only gateway.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            subdomain: false,
        }
    }

    /// Creates a gateway that also serves subdomain-style requests.
    pub fn with_subdomain(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            subdomain: true,
        }
    }

    fn base(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }
}

/// Returns the default public gateway mirrors in preference order.
pub fn default_gateways() -> Vec<GatewayEndpoint> {
    DEFAULT_GATEWAYS
        .iter()
        .map(|(host, subdomain)| GatewayEndpoint {
            host: (*host).into(),
            subdomain: *subdomain,
        })
        .collect()
}

/// Expands a normalized pointer into an ordered candidate URL list.
///
/// `Http` pointers yield exactly themselves. `RawCid` pointers yield, per
/// gateway in order, a path-style URL and (where supported) a
/// subdomain-style URL, with any sub-path preserved.
pub fn candidates(pointer: &NormalizedPointer, gateways: &[GatewayEndpoint]) -> Vec<String> {
    if pointer.is_http() {
        return vec![pointer.value.clone()];
    }

    let (cid, path) = pointer.cid_and_path();
    let mut urls = Vec::with_capacity(gateways.len() * 2);

    for gateway in gateways {
        urls.push(format!("{}/ipfs/{}{}", gateway.base(), cid, path));
        if gateway.subdomain && !gateway.host.contains("://") {
            urls.push(format!("https://{}.ipfs.{}{}", cid, gateway.host, path));
        }
    }

    urls
}
