use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::metadata::gateway::DEFAULT_GATEWAYS;
use crate::metadata::{FetchOptions, DEFAULT_MAX_CONCURRENT};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub gateways: GatewayConfig,

    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Gateway base URLs in priority order
    #[serde(default = "default_gateway_urls")]
    pub urls: Vec<String>,
}

fn default_gateway_urls() -> Vec<String> {
    DEFAULT_GATEWAYS.iter().map(|s| s.to_string()).collect()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            urls: default_gateway_urls(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Timeout for each gateway request in milliseconds (default: 10000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Serve repeated lookups from the in-memory cache (default: true)
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,

    /// Chunk size for batch fetches (default: 5)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_use_cache() -> bool {
    true
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            use_cache: default_use_cache(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl FetchConfig {
    /// Options for [`MetadataFetcher`](crate::metadata::MetadataFetcher) calls.
    pub fn options(&self) -> FetchOptions {
        FetchOptions {
            use_cache: self.use_cache,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}
