//! Multi-gateway metadata fetching.
//!
//! [`MetadataFetcher`] resolves an `ipfs://` metadata URI and the video it
//! references. Gateways are tried strictly in order; each attempt fetches
//! the metadata document and then confirms the video is reachable on the
//! *same* gateway. Any failure in either step (HTTP error, timeout, bad
//! JSON, schema mismatch, unreachable video) discards the attempt and moves
//! on to the next gateway. Only when every gateway has failed does the
//! caller see an error.
//!
//! Successful lookups are written to the shared [`MetadataCache`] keyed by
//! the URI the caller passed in.

use std::sync::Arc;
use std::time::Duration;

use coursenft_common::{AttemptFailure, AttemptStage, Error, Result, TokenId};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde_json::Value;
use tracing::debug;

use super::cache::{CacheStats, MetadataCache};
use super::events::{FetchEvent, FetchObserver, TracingObserver};
use super::gateway::{has_ipfs_scheme, strip_scheme, GatewayList, IPFS_SCHEME};
use super::model::ResolvedMedia;
use super::validate::validate_metadata;

/// Per-attempt timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-call fetch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Read from and write to the cache.
    pub use_cache: bool,
    /// Timeout applied to each individual request.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Progress of one logical fetch across the gateway list.
#[derive(Debug)]
enum FetchState {
    Idle,
    AttemptingGateway(usize),
    Succeeded { gateway: usize, media: ResolvedMedia },
    ExhaustedGateways,
}

/// Build the metadata URI of `token` under `base`: `<base>/<token>.json`.
///
/// `base` is used verbatim. It is also the cache key, so a base with a
/// trailing `/` produces a different key than one without.
pub fn token_uri(base: &str, token: TokenId) -> String {
    format!("{base}/{token}.json")
}

/// Fetches and caches course metadata through a list of IPFS gateways.
pub struct MetadataFetcher {
    client: reqwest::Client,
    gateways: GatewayList,
    cache: Arc<MetadataCache>,
    observer: Arc<dyn FetchObserver>,
    defaults: FetchOptions,
}

impl MetadataFetcher {
    /// Create a fetcher over `gateways` sharing `cache`.
    ///
    /// Events go to a [`TracingObserver`] and calls use
    /// [`FetchOptions::default`] until overridden.
    pub fn new(gateways: GatewayList, cache: Arc<MetadataCache>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("coursenft/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            gateways,
            cache,
            observer: Arc::new(TracingObserver),
            defaults: FetchOptions::default(),
        }
    }

    /// Replace the event observer.
    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the options used by [`fetch_metadata`](Self::fetch_metadata).
    pub fn with_defaults(mut self, defaults: FetchOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn gateways(&self) -> &GatewayList {
        &self.gateways
    }

    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    pub fn defaults(&self) -> FetchOptions {
        self.defaults
    }

    // -----------------------------------------------------------------------
    // Fetching
    // -----------------------------------------------------------------------

    /// Fetch `source` with the fetcher's default options.
    pub async fn fetch_metadata(&self, source: &str) -> Result<ResolvedMedia> {
        self.fetch_metadata_with(source, self.defaults).await
    }

    /// Fetch the metadata document at `source` and resolve its video.
    ///
    /// On a cache hit no request is made and the video URL is the `image`
    /// field resolved on the primary gateway, unverified.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `source` does not start with `ipfs://`.
    /// - [`Error::GatewaysExhausted`] if every gateway failed.
    pub async fn fetch_metadata_with(
        &self,
        source: &str,
        options: FetchOptions,
    ) -> Result<ResolvedMedia> {
        if options.use_cache {
            if let Some(metadata) = self.cache.get(source) {
                self.emit(FetchEvent::CacheHit {
                    source: source.to_string(),
                });
                let video_url = self.gateways.primary_url(&metadata.image);
                return Ok(ResolvedMedia {
                    metadata,
                    video_url,
                });
            }
        }

        if !has_ipfs_scheme(source) {
            return Err(Error::invalid_input(format!(
                "Invalid IPFS URI {source:?}: must start with {IPFS_SCHEME}"
            )));
        }

        let total = self.gateways.len();
        let cid = strip_scheme(source);
        let mut failures: Vec<AttemptFailure> = Vec::with_capacity(total);
        let mut state = FetchState::Idle;

        loop {
            state = match state {
                FetchState::Idle => FetchState::AttemptingGateway(0),
                FetchState::AttemptingGateway(gateway) => {
                    match self.attempt(source, cid, gateway, options.timeout).await {
                        Ok(media) => FetchState::Succeeded { gateway, media },
                        Err(failure) => {
                            self.emit(FetchEvent::AttemptFailed {
                                source: source.to_string(),
                                gateway,
                                total,
                                message: failure.to_string(),
                            });
                            failures.push(failure);
                            if gateway + 1 < total {
                                FetchState::AttemptingGateway(gateway + 1)
                            } else {
                                FetchState::ExhaustedGateways
                            }
                        }
                    }
                }
                FetchState::Succeeded { gateway, media } => {
                    if options.use_cache && self.cache.insert(source, media.metadata.clone()) {
                        debug!(source = %source, gateway = gateway + 1, "Metadata cached");
                    }
                    self.emit(FetchEvent::Succeeded {
                        source: source.to_string(),
                        gateway,
                        video_url: media.video_url.clone(),
                    });
                    return Ok(media);
                }
                FetchState::ExhaustedGateways => {
                    let err = Error::exhausted(total, failures);
                    if let Error::GatewaysExhausted { last_error, .. } = &err {
                        self.emit(FetchEvent::GatewaysExhausted {
                            source: source.to_string(),
                            attempted: total,
                            last_error: last_error.clone(),
                        });
                    }
                    return Err(err);
                }
            };
        }
    }

    /// Fetch the metadata of `token_id` under `base` (`<base>/<id>.json`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for a negative id, before any request is made;
    /// otherwise as [`fetch_metadata`](Self::fetch_metadata).
    pub async fn fetch_metadata_by_id(&self, base: &str, token_id: i64) -> Result<ResolvedMedia> {
        let token = TokenId::try_from(token_id)?;
        self.fetch_metadata_for_token(base, token).await
    }

    /// Fetch the metadata of an already validated `token` under `base`.
    pub async fn fetch_metadata_for_token(&self, base: &str, token: TokenId) -> Result<ResolvedMedia> {
        debug!(token_id = %token, "Fetching metadata for token");
        self.fetch_metadata(&token_uri(base, token)).await
    }

    /// One gateway attempt: metadata document, validation, then video.
    async fn attempt(
        &self,
        source: &str,
        cid: &str,
        gateway: usize,
        timeout: Duration,
    ) -> std::result::Result<ResolvedMedia, AttemptFailure> {
        let metadata_failure = |msg: String| AttemptFailure::new(gateway, AttemptStage::Metadata, msg);
        let video_failure = |msg: String| AttemptFailure::new(gateway, AttemptStage::Video, msg);

        let url = self
            .gateways
            .url_for(cid, gateway)
            .ok_or_else(|| metadata_failure("no such gateway".to_string()))?;

        self.emit(FetchEvent::AttemptStarted {
            source: source.to_string(),
            gateway,
            total: self.gateways.len(),
            url: url.clone(),
        });

        let raw = self.get_json(&url, timeout).await.map_err(metadata_failure)?;
        let metadata = validate_metadata(&raw).map_err(|e| metadata_failure(e.to_string()))?;

        let video_url = self
            .gateways
            .url_for(strip_scheme(&metadata.image), gateway)
            .ok_or_else(|| video_failure("no such gateway".to_string()))?;
        let video_url = self
            .check_reachable(&video_url, timeout)
            .await
            .map_err(video_failure)?;

        Ok(ResolvedMedia {
            metadata,
            video_url,
        })
    }

    /// GET `url` as JSON, bypassing HTTP caches, within `timeout`.
    async fn get_json(&self, url: &str, timeout: Duration) -> std::result::Result<Value, String> {
        let request = async {
            let resp = self
                .client
                .get(url)
                .header(ACCEPT, "application/json")
                .header(CACHE_CONTROL, "no-cache")
                .send()
                .await
                .map_err(|e| format!("request failed: {e}"))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(format!("HTTP {status}"));
            }

            resp.json::<Value>()
                .await
                .map_err(|e| format!("invalid JSON: {e}"))
        };

        tokio::time::timeout(timeout, request)
            .await
            .unwrap_or_else(|_| Err(format!("timed out after {}ms", timeout.as_millis())))
    }

    /// Confirm `url` answers with a 2xx within `timeout`.
    ///
    /// Only the response head is awaited; the body is dropped unread. Returns
    /// the final URL after redirects.
    async fn check_reachable(&self, url: &str, timeout: Duration) -> std::result::Result<String, String> {
        let request = async {
            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| format!("video request failed: {e}"))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(format!("video HTTP {status}"));
            }

            Ok(resp.url().to_string())
        };

        tokio::time::timeout(timeout, request)
            .await
            .unwrap_or_else(|_| Err(format!("video timed out after {}ms", timeout.as_millis())))
    }

    fn emit(&self, event: FetchEvent) {
        self.observer.on_event(&event);
    }

    // -----------------------------------------------------------------------
    // Cache management
    // -----------------------------------------------------------------------

    /// Check whether `source` is cached.
    pub fn is_cached(&self, source: &str) -> bool {
        self.cache.contains(source)
    }

    /// Check whether the metadata of `token_id` under `base` is cached.
    ///
    /// Negative ids are never cached.
    pub fn is_token_cached(&self, base: &str, token_id: i64) -> bool {
        TokenId::try_from(token_id)
            .map(|token| self.cache.contains(&token_uri(base, token)))
            .unwrap_or(false)
    }

    /// Drop `source` from the cache, returning whether it was present.
    pub fn remove_from_cache(&self, source: &str) -> bool {
        let removed = self.cache.remove(source);
        if removed {
            debug!(source = %source, "Removed from cache");
        }
        removed
    }

    /// Empty the cache, returning the number of removed entries.
    pub fn clear_cache(&self) -> usize {
        let removed = self.cache.clear();
        debug!(removed, "Cache cleared");
        removed
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
