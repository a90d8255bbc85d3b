use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coursenft")]
#[command(author, version, about = "IPFS metadata client for NFT-gated yoga courses")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a metadata document and resolve its video
    Fetch {
        /// Metadata URI (ipfs://...)
        #[arg(required = true)]
        uri: String,

        /// Skip the metadata cache
        #[arg(long)]
        no_cache: bool,

        /// Per-request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Fetch the metadata of one token of a collection
    Token {
        /// Collection base URI (ipfs://...)
        base: String,

        /// Token id (non-negative integer)
        #[arg(allow_hyphen_values = true)]
        id: String,
    },

    /// Fetch several tokens in bounded-concurrency chunks
    Batch {
        /// Collection base URI (ipfs://...)
        base: String,

        /// Token ids
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,

        /// Number of tokens fetched concurrently per chunk
        #[arg(long)]
        max_concurrent: Option<usize>,
    },

    /// Warm the cache for a set of tokens and print cache statistics
    Preload {
        /// Collection base URI (ipfs://...)
        base: String,

        /// Token ids
        #[arg(allow_negative_numbers = true)]
        ids: Vec<i64>,
    },

    /// Validate a local metadata JSON document
    Validate {
        /// Metadata file to validate
        #[arg(required = true)]
        file: PathBuf,
    },

    /// List configured gateways in priority order
    Gateways,

    /// Validate configuration file
    CheckConfig {
        /// Config file to validate (falls back to --config, then defaults)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },
}
