//! IPFS metadata pipeline for course NFTs.
//!
//! This module resolves content-addressed course metadata and the video it
//! references through a list of redundant HTTP gateways.
//!
//! # Module layout
//!
//! - [`model`] -- Canonical metadata and result types.
//! - [`gateway`] -- Gateway list and `ipfs://` URI helpers.
//! - [`validate`] -- Decoding of untrusted JSON documents.
//! - [`cache`] -- In-memory cache of validated metadata.
//! - [`events`] -- Fetch events and observers.
//! - [`fetcher`] -- Sequential multi-gateway fetch with per-attempt timeouts.
//! - [`batch`] -- Preloading and chunked batch fetching.

pub mod batch;
pub mod cache;
pub mod events;
pub mod fetcher;
pub mod gateway;
pub mod model;
pub mod validate;

pub use batch::{BatchOrchestrator, DEFAULT_MAX_CONCURRENT};
pub use cache::{CacheStats, MetadataCache};
pub use events::{
    FanoutObserver, FetchEvent, FetchObserver, RecordedEvent, RecordingObserver, TracingObserver,
};
pub use fetcher::{token_uri, FetchOptions, MetadataFetcher, DEFAULT_TIMEOUT};
pub use gateway::{strip_scheme, GatewayList, DEFAULT_GATEWAYS};
pub use model::{
    Attribute, AttributeValue, BatchItem, BatchOutcome, CourseMetadata, CourseProperties,
    ResolvedMedia,
};
pub use validate::{validate, validate_metadata, Validated};
