mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

use crate::metadata::GatewayList;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./coursenft.toml",
        "~/.config/coursenft/config.toml",
        "/etc/coursenft/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Build the gateway list described by the config
pub fn gateway_list(config: &Config) -> Result<GatewayList> {
    GatewayList::new(config.gateways.urls.iter().cloned()).context("Invalid gateway list")
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.gateways.urls.is_empty() {
        anyhow::bail!("At least one IPFS gateway must be configured");
    }

    for url in &config.gateways.urls {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("Gateway '{}' must be an http(s) URL", url);
        }
    }

    if config.fetch.timeout_ms == 0 {
        anyhow::bail!("Fetch timeout cannot be 0");
    }

    if config.fetch.max_concurrent == 0 {
        anyhow::bail!("max_concurrent cannot be 0");
    }

    if !config.fetch.use_cache {
        tracing::warn!("Metadata cache is disabled; every lookup will hit the gateways");
    }

    Ok(())
}
