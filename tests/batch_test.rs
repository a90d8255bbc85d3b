//! Integration tests for preloading and chunked batch fetching.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{course_json, video_response, GatewayHarness};
use coursenft::metadata::BatchOrchestrator;
use wiremock::ResponseTemplate;

const BASE: &str = "ipfs://QmBase";

fn token_cid(id: i64) -> String {
    format!("QmBase/{id}.json")
}

fn video_cid(id: i64) -> String {
    format!("QmVideo{id}")
}

async fn mount_tokens(h: &GatewayHarness, ids: &[i64]) {
    for &id in ids {
        h.mount_course(0, &token_cid(id), &format!("Course {id}"), &video_cid(id))
            .await;
    }
}

/// Per-document delay for the concurrency tests.
const DELAY: Duration = Duration::from_millis(400);

/// Mount tokens whose metadata documents each take [`DELAY`] to answer.
async fn mount_slow_tokens(h: &GatewayHarness, ids: &[i64]) {
    for &id in ids {
        h.mount(
            0,
            &token_cid(id),
            ResponseTemplate::new(200)
                .set_body_json(course_json(&format!("Course {id}"), &video_cid(id)))
                .set_delay(DELAY),
        )
        .await;
        h.mount(0, &video_cid(id), video_response()).await;
    }
}

fn orchestrator(h: &GatewayHarness) -> BatchOrchestrator {
    BatchOrchestrator::new(Arc::clone(&h.fetcher))
}

#[tokio::test]
async fn results_follow_input_order() {
    let h = GatewayHarness::new(1).await;
    let ids = [3, 1, 2];
    mount_tokens(&h, &ids).await;

    let items = orchestrator(&h).fetch_multiple(BASE, &ids, 5).await;

    let names: Vec<&str> = items
        .iter()
        .map(|i| i.metadata().unwrap().metadata.name.as_str())
        .collect();
    assert_eq!(names, vec!["Course 3", "Course 1", "Course 2"]);
    assert_eq!(items.iter().map(|i| i.token_id).collect::<Vec<_>>(), ids);
}

#[tokio::test]
async fn next_chunk_starts_after_previous_settles() {
    let h = GatewayHarness::new(1).await;
    let ids = [1, 2, 3, 4, 5, 6];
    mount_tokens(&h, &ids).await;

    let items = orchestrator(&h).fetch_multiple(BASE, &ids, 5).await;
    assert_eq!(items.len(), 6);
    assert!(items.iter().all(|i| i.error().is_none()));

    let paths = h.request_paths().await;
    let position = |p: String| paths.iter().position(|x| *x == p).unwrap();
    let sixth = position(h.gateway_path(0, &token_cid(6)));
    for id in 1..=5 {
        assert!(
            position(h.gateway_path(0, &video_cid(id))) < sixth,
            "token 6 requested before token {id} settled"
        );
    }
}

#[tokio::test]
async fn lookups_within_a_chunk_run_concurrently() {
    let h = GatewayHarness::with_timeout(1, Duration::from_secs(5)).await;
    let ids = [1, 2, 3, 4, 5];
    mount_slow_tokens(&h, &ids).await;

    let started = Instant::now();
    let items = orchestrator(&h).fetch_multiple(BASE, &ids, 5).await;
    let elapsed = started.elapsed();

    assert!(items.iter().all(|i| i.error().is_none()));
    assert!(elapsed < DELAY * 2, "chunk took {elapsed:?}");
}

#[tokio::test]
async fn chunks_run_one_after_another() {
    let h = GatewayHarness::with_timeout(1, Duration::from_secs(5)).await;
    let ids = [1, 2, 3, 4];
    mount_slow_tokens(&h, &ids).await;

    let started = Instant::now();
    let items = orchestrator(&h).fetch_multiple(BASE, &ids, 2).await;
    let elapsed = started.elapsed();

    assert_eq!(items.len(), 4);
    assert!(elapsed >= DELAY * 2, "two chunks took only {elapsed:?}");
}

#[tokio::test]
async fn failing_token_does_not_affect_siblings() {
    let h = GatewayHarness::new(1).await;
    mount_tokens(&h, &[1, 3]).await;
    h.mount(0, &token_cid(2), ResponseTemplate::new(500)).await;

    let items = orchestrator(&h).fetch_multiple(BASE, &[1, 2, 3, -4], 2).await;

    assert_eq!(items.len(), 4);
    assert_eq!(items[0].metadata().unwrap().metadata.name, "Course 1");
    assert!(items[1].error().unwrap().contains("all 1 gateways"));
    assert!(items[1].metadata().is_none());
    assert_eq!(items[2].metadata().unwrap().metadata.name, "Course 3");
    assert!(items[3].error().unwrap().contains("non-negative"));
}

#[tokio::test]
async fn batch_items_serialize_with_token_id() {
    let h = GatewayHarness::new(1).await;
    mount_tokens(&h, &[1]).await;

    let items = orchestrator(&h).fetch_multiple(BASE, &[1, -1], 5).await;
    let value = serde_json::to_value(&items).unwrap();

    assert_eq!(value[0]["token_id"], 1);
    assert_eq!(value[0]["metadata"]["metadata"]["name"], "Course 1");
    assert!(value[0].get("error").is_none());
    assert_eq!(value[1]["token_id"], -1);
    assert!(value[1]["error"].is_string());
}

#[tokio::test]
async fn batch_reuses_cached_entries() {
    let h = GatewayHarness::new(1).await;
    mount_tokens(&h, &[1, 2]).await;
    let batch = orchestrator(&h);

    batch.fetch_multiple(BASE, &[1, 2], 5).await;
    let after_first = h.request_paths().await.len();
    let items = batch.fetch_multiple(BASE, &[2, 1], 5).await;

    assert_eq!(h.request_paths().await.len(), after_first);
    assert_eq!(items[0].metadata().unwrap().metadata.name, "Course 2");
}

#[tokio::test]
async fn preload_caches_successes_and_skips_failures() {
    let h = GatewayHarness::new(1).await;
    mount_tokens(&h, &[1, 3]).await;

    orchestrator(&h).preload(BASE, &[1, 2, 3]).await;

    assert!(h.fetcher.is_token_cached(BASE, 1));
    assert!(!h.fetcher.is_token_cached(BASE, 2));
    assert!(h.fetcher.is_token_cached(BASE, 3));

    let stats = h.fetcher.cache_stats();
    assert_eq!(stats.size, 2);
    assert_eq!(stats.keys, vec!["ipfs://QmBase/1.json", "ipfs://QmBase/3.json"]);
}

#[tokio::test]
async fn preload_runs_every_lookup_at_once() {
    let h = GatewayHarness::with_timeout(1, Duration::from_secs(5)).await;
    let ids: Vec<i64> = (1..=8).collect();
    mount_slow_tokens(&h, &ids).await;

    let started = Instant::now();
    orchestrator(&h).preload(BASE, &ids).await;
    let elapsed = started.elapsed();

    assert_eq!(h.cache.len(), 8);
    assert!(elapsed < DELAY * 2, "preload took {elapsed:?}");
}

#[tokio::test]
async fn preload_issues_all_lookups_together() {
    let h = GatewayHarness::new(1).await;
    let ids: Vec<i64> = (1..=8).collect();
    mount_tokens(&h, &ids).await;

    orchestrator(&h).preload(BASE, &ids).await;

    let paths = h.request_paths().await;
    let metadata_requests = paths.iter().filter(|p| p.ends_with(".json")).count();
    assert_eq!(metadata_requests, 8);
    assert_eq!(h.cache.len(), 8);
}
