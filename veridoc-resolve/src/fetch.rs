//! The fetch pipeline.
//!
//! Resolution order: the trusted proxy is tried exactly once (bounded by an
//! abort timeout), then the candidate URLs are walked serially in a single
//! pass, first success wins. No retries, no fan-out: serial fallback keeps
//! gateway load flat and makes the winning URL well-defined.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use veridoc_core::constants::{DEFAULT_GATEWAY_TIMEOUT_SECS, DEFAULT_PROXY_TIMEOUT_SECS};
use veridoc_core::error::{Result, VeridocError};
use veridoc_core::types::{NormalizedPointer, ProxyEnvelope, ResolvedMetadata};

use crate::candidates::{candidates, default_gateways, GatewayEndpoint};
use crate::normalize::normalize;
use crate::session::ResolutionTicket;

/// Resolver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Trusted proxy endpoint tried before any gateway. `None` goes
    /// straight to the mirrors (the server-side resolver runs this way,
    /// since it *is* the proxy).
    pub proxy_url: Option<String>,
    /// Bound on the single proxy attempt, in seconds.
    pub proxy_timeout_secs: u64,
    /// Bound on each gateway attempt, in seconds.
    pub gateway_timeout_secs: u64,
    /// Gateway mirrors, in preference order.
    pub gateways: Vec<GatewayEndpoint>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            proxy_url: None,
            proxy_timeout_secs: DEFAULT_PROXY_TIMEOUT_SECS,
            gateway_timeout_secs: DEFAULT_GATEWAY_TIMEOUT_SECS,
            gateways: default_gateways(),
        }
    }
}

impl ResolverConfig {
    /// Sets the trusted proxy endpoint.
    pub fn with_proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    /// Replaces the gateway list.
    pub fn with_gateways(mut self, gateways: Vec<GatewayEndpoint>) -> Self {
        self.gateways = gateways;
        self
    }
}

/// A failed candidate attempt. Consumed by the fallback loop; kept
/// inspectable so diagnostics and tests can see why each mirror was
/// skipped.
#[derive(Clone, Debug)]
pub struct GatewayFailure {
    /// The candidate URL that was attempted.
    pub url: String,
    /// Why the attempt was abandoned.
    pub reason: String,
}

impl fmt::Display for GatewayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.reason)
    }
}

/// Metadata resolver implementing the proxy-first gateway-fallback pipeline.
pub struct MetadataResolver {
    config: ResolverConfig,
    http_client: reqwest::Client,
}

impl MetadataResolver {
    /// Creates a resolver with default configuration.
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Creates a resolver with custom configuration.
    pub fn with_config(config: ResolverConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Returns the resolver's configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a raw pointer value from an upstream record.
    ///
    /// Returns `Ok(None)` when the record holds nothing to resolve, a
    /// skip distinct from the attempted-and-exhausted failure.
    #[instrument(skip(self, raw))]
    pub async fn resolve(&self, raw: &Value) -> Result<Option<ResolvedMetadata>> {
        let Some(pointer) = normalize(raw) else {
            debug!("No usable pointer in record");
            return Ok(None);
        };
        self.resolve_pointer(&pointer).await.map(Some)
    }

    /// Resolves an already-normalized pointer.
    #[instrument(skip(self), fields(pointer = %pointer.value))]
    pub async fn resolve_pointer(&self, pointer: &NormalizedPointer) -> Result<ResolvedMetadata> {
        self.resolve_pointer_cancellable(pointer, None).await
    }

    /// Resolves a pointer, stopping early if `ticket` is superseded.
    ///
    /// The ticket is checked before every candidate attempt so an
    /// abandoned resolution stops burning gateway requests once a newer
    /// one has started.
    pub async fn resolve_pointer_cancellable(
        &self,
        pointer: &NormalizedPointer,
        ticket: Option<&ResolutionTicket>,
    ) -> Result<ResolvedMetadata> {
        if let Some(proxy) = &self.config.proxy_url {
            match self.try_proxy(proxy, pointer).await {
                Ok(meta) => {
                    debug!("Resolved via proxy");
                    return Ok(meta);
                }
                // Proxy failure is always recovered locally.
                Err(e) => warn!(error = %e, "Proxy failed, falling back to gateways"),
            }
        }

        let urls = candidates(pointer, &self.config.gateways);
        for url in &urls {
            if let Some(ticket) = ticket {
                if !ticket.is_current() {
                    debug!(url = %url, "Resolution superseded, abandoning");
                    return Err(VeridocError::Superseded);
                }
            }

            match self.fetch_candidate(url).await {
                Ok(meta) => {
                    debug!(url = %url, "Resolved from gateway");
                    return Ok(meta);
                }
                Err(failure) => {
                    warn!(url = %failure.url, reason = %failure.reason, "Gateway candidate failed");
                }
            }
        }

        Err(VeridocError::GatewaysExhausted {
            pointer: pointer.value.clone(),
            attempted: urls,
        })
    }

    /// The single proxy hop. Any non-success outcome (network error,
    /// non-200, malformed envelope, timeout) becomes `ProxyUnavailable`.
    async fn try_proxy(
        &self,
        proxy: &str,
        pointer: &NormalizedPointer,
    ) -> Result<ResolvedMetadata> {
        let response = self
            .http_client
            .get(proxy)
            .query(&[("cid", pointer.value.as_str())])
            .timeout(Duration::from_secs(self.config.proxy_timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VeridocError::Timeout {
                        seconds: self.config.proxy_timeout_secs,
                    }
                } else {
                    VeridocError::ProxyUnavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(VeridocError::ProxyUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let envelope: ProxyEnvelope = response
            .json()
            .await
            .map_err(|e| VeridocError::ProxyUnavailable(format!("malformed envelope: {}", e)))?;

        match envelope {
            ProxyEnvelope {
                ok: true,
                data: Some(data),
                resolved_url,
                ..
            } => Ok(ResolvedMetadata::from_value(resolved_url, data)),
            ProxyEnvelope { error, .. } => Err(VeridocError::ProxyUnavailable(
                error.unwrap_or_else(|| "proxy returned no data".into()),
            )),
        }
    }

    /// One gateway attempt. Every failure mode maps to a `GatewayFailure`
    /// so the fallback loop can advance.
    async fn fetch_candidate(
        &self,
        url: &str,
    ) -> std::result::Result<ResolvedMetadata, GatewayFailure> {
        let fail = |reason: String| GatewayFailure {
            url: url.to_string(),
            reason,
        };

        let response = self
            .http_client
            .get(url)
            .timeout(Duration::from_secs(self.config.gateway_timeout_secs))
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fail(format!("HTTP {}", response.status())));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let text = response.text().await.map_err(|e| fail(e.to_string()))?;
        let data = decode_body(&content_type, text);

        Ok(ResolvedMetadata::from_value(Some(url.to_string()), data))
    }
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies a fetched body.
///
/// JSON-flavored content types parse as JSON; anything else gets a
/// best-effort parse. Either way an unparsable body is wrapped under a
/// `content` field rather than failing the resolution.
fn decode_body(content_type: &str, text: String) -> Value {
    let declared_json = content_type.to_ascii_lowercase().contains("json");

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => value,
        Err(e) => {
            if declared_json {
                warn!(error = %e, "Declared-JSON body failed to parse, wrapping as text");
            }
            json!({ "content": text })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ResolutionSession;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CID: &str = "bafyExampleCID1234567890123456789012345";

    fn gateway_endpoint(server: &MockServer) -> GatewayEndpoint {
        GatewayEndpoint::new(server.uri())
    }

    fn config_with(proxy: Option<String>, gateways: Vec<GatewayEndpoint>) -> ResolverConfig {
        ResolverConfig {
            proxy_url: proxy,
            gateways,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_proxy_success_skips_gateways() {
        let proxy = MockServer::start().await;
        let gateway = MockServer::start().await;

        let envelope = json!({
            "ok": true,
            "resolvedUrl": "https://dweb.link/ipfs/bafyProxy",
            "data": {"name": "BSc Physics"}
        });

        Mock::given(method("GET"))
            .and(path("/api/v1/metadata/resolve"))
            .and(query_param("cid", CID))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope))
            .expect(1)
            .mount(&proxy)
            .await;

        // No gateway mirror may be contacted when the proxy succeeds.
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&gateway)
            .await;

        let resolver = MetadataResolver::with_config(config_with(
            Some(format!("{}/api/v1/metadata/resolve", proxy.uri())),
            vec![gateway_endpoint(&gateway)],
        ));

        let meta = resolver
            .resolve_pointer(&NormalizedPointer::raw_cid(CID))
            .await
            .unwrap();

        assert_eq!(meta.resolved_url.as_deref(), Some("https://dweb.link/ipfs/bafyProxy"));
        assert_eq!(meta.name(), Some("BSc Physics"));
    }

    #[tokio::test]
    async fn test_proxy_failure_falls_back_to_gateway() {
        let proxy = MockServer::start().await;
        let gateway = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&proxy)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/ipfs/{}", CID)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "MSc Chemistry"})),
            )
            .mount(&gateway)
            .await;

        let resolver = MetadataResolver::with_config(config_with(
            Some(proxy.uri()),
            vec![gateway_endpoint(&gateway)],
        ));

        let meta = resolver
            .resolve_pointer(&NormalizedPointer::raw_cid(CID))
            .await
            .unwrap();

        assert_eq!(
            meta.resolved_url.as_deref(),
            Some(format!("{}/ipfs/{}", gateway.uri(), CID).as_str())
        );
        assert_eq!(meta.name(), Some("MSc Chemistry"));
    }

    #[tokio::test]
    async fn test_proxy_timeout_aborts_and_falls_back() {
        let proxy = MockServer::start().await;
        let gateway = MockServer::start().await;

        // The proxy stalls far past its budget; the attempt must be
        // aborted at proxy_timeout_secs, not awaited to completion.
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "data": {"name": "stalled"}}))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&proxy)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/ipfs/{}", CID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "BA History"})))
            .expect(1)
            .mount(&gateway)
            .await;

        let resolver = MetadataResolver::with_config(ResolverConfig {
            proxy_url: Some(proxy.uri()),
            proxy_timeout_secs: 1,
            gateways: vec![gateway_endpoint(&gateway)],
            ..Default::default()
        });

        let started = std::time::Instant::now();
        let meta = resolver
            .resolve_pointer(&NormalizedPointer::raw_cid(CID))
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(meta.name(), Some("BA History"));
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_proxy_failure() {
        let proxy = MockServer::start().await;
        let gateway = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&proxy)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/ipfs/{}", CID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": 1})))
            .mount(&gateway)
            .await;

        let resolver = MetadataResolver::with_config(config_with(
            Some(proxy.uri()),
            vec![gateway_endpoint(&gateway)],
        ));

        let meta = resolver
            .resolve_pointer(&NormalizedPointer::raw_cid(CID))
            .await
            .unwrap();

        assert!(meta.resolved_url.unwrap().starts_with(&gateway.uri()));
    }

    #[tokio::test]
    async fn test_second_gateway_wins_after_first_fails() {
        let first = MockServer::start().await;
        let second = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&first)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/ipfs/{}", CID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "ok"})))
            .expect(1)
            .mount(&second)
            .await;

        let resolver = MetadataResolver::with_config(config_with(
            None,
            vec![gateway_endpoint(&first), gateway_endpoint(&second)],
        ));

        let meta = resolver
            .resolve_pointer(&NormalizedPointer::raw_cid(CID))
            .await
            .unwrap();

        assert_eq!(
            meta.resolved_url.as_deref(),
            Some(format!("{}/ipfs/{}", second.uri(), CID).as_str())
        );
    }

    #[tokio::test]
    async fn test_all_gateways_exhausted() {
        let first = MockServer::start().await;
        let second = MockServer::start().await;

        for server in [&first, &second] {
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(404))
                .mount(server)
                .await;
        }

        let resolver = MetadataResolver::with_config(config_with(
            None,
            vec![gateway_endpoint(&first), gateway_endpoint(&second)],
        ));

        let err = resolver
            .resolve_pointer(&NormalizedPointer::raw_cid(CID))
            .await
            .unwrap_err();

        match err {
            VeridocError::GatewaysExhausted { pointer, attempted } => {
                assert_eq!(pointer, CID);
                assert_eq!(
                    attempted,
                    vec![
                        format!("{}/ipfs/{}", first.uri(), CID),
                        format!("{}/ipfs/{}", second.uri(), CID),
                    ]
                );
            }
            other => panic!("expected GatewaysExhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_text_body_wrapped_under_content() {
        let gateway = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("plain certificate text")
                    .insert_header("content-type", "text/plain"),
            )
            .mount(&gateway)
            .await;

        let resolver =
            MetadataResolver::with_config(config_with(None, vec![gateway_endpoint(&gateway)]));

        let meta = resolver
            .resolve_pointer(&NormalizedPointer::raw_cid(CID))
            .await
            .unwrap();

        assert_eq!(meta.data, json!({"content": "plain certificate text"}));
    }

    #[tokio::test]
    async fn test_json_body_with_text_content_type() {
        let gateway = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"name":"BEng"}"#)
                    .insert_header("content-type", "text/plain"),
            )
            .mount(&gateway)
            .await;

        let resolver =
            MetadataResolver::with_config(config_with(None, vec![gateway_endpoint(&gateway)]));

        let meta = resolver
            .resolve_pointer(&NormalizedPointer::raw_cid(CID))
            .await
            .unwrap();

        // Best-effort parse recovers JSON served with the wrong content type.
        assert_eq!(meta.name(), Some("BEng"));
    }

    #[tokio::test]
    async fn test_empty_pointer_is_skip_not_error() {
        let resolver = MetadataResolver::new();
        let outcome = resolver.resolve(&json!("")).await.unwrap();
        assert!(outcome.is_none());

        let outcome = resolver.resolve(&json!({"status": "verified"})).await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_superseded_ticket_abandons_resolution() {
        let gateway = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": 1})))
            .expect(0)
            .mount(&gateway)
            .await;

        let session = ResolutionSession::new();
        let stale = session.begin();
        let _current = session.begin();

        let resolver =
            MetadataResolver::with_config(config_with(None, vec![gateway_endpoint(&gateway)]));

        let err = resolver
            .resolve_pointer_cancellable(&NormalizedPointer::raw_cid(CID), Some(&stale))
            .await
            .unwrap_err();

        assert!(matches!(err, VeridocError::Superseded));
    }

    #[test]
    fn test_decode_body_wraps_unparsable_declared_json() {
        let data = decode_body("application/json", "<html>gateway error</html>".into());
        assert_eq!(data, json!({"content": "<html>gateway error</html>"}));
    }
}
