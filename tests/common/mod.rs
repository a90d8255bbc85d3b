//! Shared test harness for integration tests.
//!
//! Provides [`GatewayHarness`], which starts one wiremock server and exposes
//! it as several IPFS gateways (`/gw1/`, `/gw2/`, ...). Paths that have no
//! mock mounted answer 404, so an unconfigured gateway is a failing one.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use coursenft::metadata::{
    FanoutObserver, FetchObserver, FetchOptions, GatewayList, MetadataCache, MetadataFetcher,
    RecordingObserver, TracingObserver,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Per-request timeout used by the harness fetcher.
pub const TEST_TIMEOUT: Duration = Duration::from_millis(300);

/// A delay comfortably above [`TEST_TIMEOUT`].
pub const SLOW: Duration = Duration::from_secs(3);

/// Mock gateways plus a fetcher wired to them.
pub struct GatewayHarness {
    pub server: MockServer,
    pub cache: Arc<MetadataCache>,
    pub observer: Arc<RecordingObserver>,
    pub fetcher: Arc<MetadataFetcher>,
    gateway_count: usize,
}

impl GatewayHarness {
    /// Start a server exposing `gateway_count` gateways.
    pub async fn new(gateway_count: usize) -> Self {
        Self::with_timeout(gateway_count, TEST_TIMEOUT).await
    }

    /// Like [`new`](Self::new) with a custom per-request timeout.
    pub async fn with_timeout(gateway_count: usize, timeout: Duration) -> Self {
        let server = MockServer::start().await;
        let bases: Vec<String> = (0..gateway_count)
            .map(|i| format!("{}/gw{}/", server.uri(), i + 1))
            .collect();

        let cache = Arc::new(MetadataCache::new());
        let observer = RecordingObserver::new();
        // Keep the tracing output visible when a test fails.
        let observers: Vec<Arc<dyn FetchObserver>> = vec![Arc::new(TracingObserver), observer.clone()];
        let fetcher = MetadataFetcher::new(
            GatewayList::new(bases).expect("valid gateway list"),
            cache.clone(),
        )
        .with_client(
            reqwest::Client::builder()
                .no_proxy()
                .build()
                .expect("test HTTP client"),
        )
        .with_observer(Arc::new(FanoutObserver::new(observers)))
        .with_defaults(FetchOptions {
            use_cache: true,
            timeout,
        });

        Self {
            server,
            cache,
            observer,
            fetcher: Arc::new(fetcher),
            gateway_count,
        }
    }

    pub fn gateway_count(&self) -> usize {
        self.gateway_count
    }

    /// URL path of `cid` on zero-based gateway `gateway`.
    pub fn gateway_path(&self, gateway: usize, cid: &str) -> String {
        format!("/gw{}/{}", gateway + 1, cid)
    }

    /// Full URL of `cid` on zero-based gateway `gateway`.
    pub fn gateway_url(&self, gateway: usize, cid: &str) -> String {
        format!("{}{}", self.server.uri(), self.gateway_path(gateway, cid))
    }

    /// Mount `template` for GET `cid` on `gateway`.
    pub async fn mount(&self, gateway: usize, cid: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(self.gateway_path(gateway, cid)))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Mount a metadata document and a reachable video on `gateway`.
    pub async fn mount_course(&self, gateway: usize, cid: &str, name: &str, video_cid: &str) {
        self.mount(gateway, cid, ResponseTemplate::new(200).set_body_json(course_json(name, video_cid)))
            .await;
        self.mount(gateway, video_cid, video_response()).await;
    }

    /// Paths of all received requests, in arrival order.
    pub async fn request_paths(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.url.path().to_string())
            .collect()
    }
}

/// A valid metadata document pointing at `ipfs://<video_cid>`.
pub fn course_json(name: &str, video_cid: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "image": format!("ipfs://{video_cid}"),
        "attributes": [
            {"trait_type": "Style", "value": "Hatha"},
            {"trait_type": "Lessons", "value": 8}
        ],
        "properties": {
            "category": "Yoga",
            "course_type": "Video Course",
            "accessibility_level": "Beginner",
            "redeemable": true,
            "instructor_certified": true,
            "style": "Hatha"
        }
    })
}

/// A small binary body standing in for a video.
pub fn video_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "video/mp4")
        .set_body_bytes(vec![0u8; 64])
}
