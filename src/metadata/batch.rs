//! Batch fetching for many tokens of one collection.
//!
//! The [`BatchOrchestrator`] wraps a shared [`MetadataFetcher`] and offers
//! two modes:
//!
//! - [`preload`](BatchOrchestrator::preload) fires every lookup at once to
//!   warm the cache and only logs failures.
//! - [`fetch_multiple`](BatchOrchestrator::fetch_multiple) processes ids in
//!   consecutive chunks, waiting for each chunk to settle before starting
//!   the next, and returns one [`BatchItem`] per id in input order.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::fetcher::MetadataFetcher;
use super::model::{BatchItem, BatchOutcome};

/// Chunk size used when the caller does not pick one.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Runs many token lookups against a shared fetcher.
pub struct BatchOrchestrator {
    fetcher: Arc<MetadataFetcher>,
}

impl BatchOrchestrator {
    pub fn new(fetcher: Arc<MetadataFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Arc<MetadataFetcher> {
        &self.fetcher
    }

    /// Fetch every token concurrently to populate the cache.
    ///
    /// Individual failures are logged and otherwise ignored. Returns once
    /// every lookup has settled.
    pub async fn preload(&self, base: &str, token_ids: &[i64]) {
        if token_ids.is_empty() {
            warn!("No token IDs provided for preloading");
            return;
        }

        info!(count = token_ids.len(), "Starting metadata preload");

        let lookups = token_ids.iter().map(|&token_id| async move {
            match self.fetcher.fetch_metadata_by_id(base, token_id).await {
                Ok(_) => debug!(token_id, "Preloaded token"),
                Err(e) => warn!(token_id, error = %e, "Failed to preload token"),
            }
        });
        join_all(lookups).await;

        info!(
            cache_size = self.fetcher.cache().len(),
            "Preload completed"
        );
    }

    /// Fetch tokens in chunks of `max_concurrent`, preserving input order.
    ///
    /// Lookups within a chunk run concurrently; a chunk starts only after
    /// the previous one has fully settled. A `max_concurrent` of zero is
    /// treated as one.
    pub async fn fetch_multiple(
        &self,
        base: &str,
        token_ids: &[i64],
        max_concurrent: usize,
    ) -> Vec<BatchItem> {
        let chunk_size = max_concurrent.max(1);
        let mut results = Vec::with_capacity(token_ids.len());

        for (index, chunk) in token_ids.chunks(chunk_size).enumerate() {
            debug!(chunk = index, size = chunk.len(), "Fetching batch chunk");

            let lookups = chunk.iter().map(|&token_id| async move {
                let outcome = match self.fetcher.fetch_metadata_by_id(base, token_id).await {
                    Ok(media) => BatchOutcome::Metadata(media),
                    Err(e) => BatchOutcome::Error(e.to_string()),
                };
                BatchItem { token_id, outcome }
            });

            results.extend(join_all(lookups).await);
        }

        results
    }
}
