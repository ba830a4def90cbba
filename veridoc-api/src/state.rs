//! App state: resolver and config.

use veridoc_resolve::{GatewayEndpoint, MetadataResolver, ResolverConfig};

/// Server configuration, read from the environment in deployments.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Gateway mirrors to resolve against, in preference order.
    pub gateways: Vec<GatewayEndpoint>,
    /// Per-gateway attempt bound in seconds.
    pub gateway_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            gateways: veridoc_resolve::default_gateways(),
            gateway_timeout_secs: veridoc_core::constants::DEFAULT_GATEWAY_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Reads configuration from the environment (`.env` honored).
    ///
    /// `VERIDOC_GATEWAYS` is a comma-separated mirror list; entries may be
    /// bare hosts or scheme-qualified bases for private mirrors, and a
    /// `+sub` suffix (`dweb.link+sub`) marks mirrors that also serve
    /// subdomain-style requests.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let gateways = std::env::var("VERIDOC_GATEWAYS")
            .ok()
            .map(|raw| parse_gateway_list(&raw))
            .filter(|gateways| !gateways.is_empty())
            .unwrap_or(defaults.gateways);

        let gateway_timeout_secs = std::env::var("VERIDOC_GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.gateway_timeout_secs);

        Self {
            gateways,
            gateway_timeout_secs,
        }
    }
}

/// Parses a comma-separated mirror list. Entries ending in `+sub` become
/// subdomain-capable gateways.
fn parse_gateway_list(raw: &str) -> Vec<GatewayEndpoint> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.strip_suffix("+sub") {
            Some(host) => GatewayEndpoint::with_subdomain(host.trim_end()),
            None => GatewayEndpoint::new(entry),
        })
        .collect()
}

/// Shared application state.
pub struct AppState {
    /// The active configuration.
    pub config: ApiConfig,
    /// Server-side resolver. Runs with no proxy hop: this service is the
    /// proxy, so a request never recurses into itself.
    pub resolver: MetadataResolver,
}

impl AppState {
    /// Builds state from configuration.
    pub fn new(config: ApiConfig) -> Self {
        let resolver_config = ResolverConfig {
            proxy_url: None,
            gateway_timeout_secs: config.gateway_timeout_secs,
            gateways: config.gateways.clone(),
            ..Default::default()
        };

        Self {
            config,
            resolver: MetadataResolver::with_config(resolver_config),
        }
    }
}
