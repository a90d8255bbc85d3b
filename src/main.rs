mod cli;

use coursenft::config::{self, Config};
use coursenft::metadata::{
    validate, BatchOrchestrator, FetchOptions, MetadataCache, MetadataFetcher,
};

use anyhow::{Context, Result};
use coursenft_common::paths::{file_extension, is_video_file};
use coursenft_common::TokenId;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "coursenft=trace,coursenft_common=debug,reqwest=debug".to_string()
        } else {
            "coursenft=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Fetch {
            uri,
            no_cache,
            timeout_ms,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let mut options = config.fetch.options();
            if no_cache {
                options.use_cache = false;
            }
            if let Some(ms) = timeout_ms {
                options.timeout = Duration::from_millis(ms);
            }
            block_on(fetch_uri(&config, &uri, options))
        }
        Commands::Token { base, id } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            block_on(fetch_token(&config, &base, &id))
        }
        Commands::Batch {
            base,
            ids,
            max_concurrent,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let max_concurrent = max_concurrent.unwrap_or(config.fetch.max_concurrent);
            block_on(fetch_batch(&config, &base, &ids, max_concurrent))
        }
        Commands::Preload { base, ids } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            block_on(preload(&config, &base, &ids))
        }
        Commands::Validate { file } => validate_file(&file),
        Commands::Gateways => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            list_gateways(&config)
        }
        Commands::CheckConfig { file } => {
            let path = file.or(cli.config);
            check_config(path.as_deref())
        }
    }
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(future)
}

fn build_fetcher(config: &Config) -> Result<MetadataFetcher> {
    let gateways = config::gateway_list(config)?;
    let cache = Arc::new(MetadataCache::new());
    Ok(MetadataFetcher::new(gateways, cache).with_defaults(config.fetch.options()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

async fn fetch_uri(config: &Config, uri: &str, options: FetchOptions) -> Result<()> {
    let fetcher = build_fetcher(config)?;
    let media = fetcher.fetch_metadata_with(uri, options).await?;
    print_json(&media)
}

async fn fetch_token(config: &Config, base: &str, id: &str) -> Result<()> {
    let token: TokenId = id.parse()?;
    let fetcher = build_fetcher(config)?;
    let media = fetcher.fetch_metadata_for_token(base, token).await?;
    print_json(&media)
}

async fn fetch_batch(config: &Config, base: &str, ids: &[i64], max_concurrent: usize) -> Result<()> {
    let batch = BatchOrchestrator::new(Arc::new(build_fetcher(config)?));
    let items = batch.fetch_multiple(base, ids, max_concurrent).await;

    let failed = items.iter().filter(|i| i.error().is_some()).count();
    tracing::info!(total = items.len(), failed, "Batch fetch finished");

    print_json(&items)
}

async fn preload(config: &Config, base: &str, ids: &[i64]) -> Result<()> {
    let batch = BatchOrchestrator::new(Arc::new(build_fetcher(config)?));
    batch.preload(base, ids).await;

    let stats = batch.fetcher().cache_stats();
    println!("Cached entries: {}", stats.size);
    for key in &stats.keys {
        println!("  {}", key);
    }
    println!("Memory usage: {}", stats.memory_usage());
    Ok(())
}

fn validate_file(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata file: {:?}", path))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse metadata file: {:?}", path))?;

    let validated = validate(&raw)?;

    println!("✓ Metadata is valid: {}", validated.metadata.name);
    let image = &validated.metadata.image;
    if is_video_file(image) {
        println!("  Video: {} ({})", image, file_extension(image));
    } else {
        println!("  Warning: {} does not look like a video file", image);
    }
    if validated.defaulted.is_empty() {
        println!("  No defaulted fields");
    } else {
        println!("  Defaulted fields:");
        for field in &validated.defaulted {
            println!("    {}", field);
        }
    }
    print_json(&validated.metadata)
}

fn list_gateways(config: &Config) -> Result<()> {
    let gateways = config::gateway_list(config)?;
    for (i, base) in gateways.iter().enumerate() {
        println!("{}. {}", i + 1, base);
    }
    Ok(())
}

fn check_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Gateways: {}", config.gateways.urls.len());
            println!("  Timeout: {}ms", config.fetch.timeout_ms);
            println!("  Cache enabled: {}", config.fetch.use_cache);
            println!("  Max concurrent: {}", config.fetch.max_concurrent);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  Gateways: {}", config.gateways.urls.len());
            println!("  Timeout: {}ms", config.fetch.timeout_ms);
        }
    }

    Ok(())
}
