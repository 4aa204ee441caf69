//! Integration tests for the HTTP routes

use crate::support::{scripted_job, snapshot, spawn_app, ScriptedSource, StubUpstream};
use coin_cache::config::UpstreamConfig;
use coin_cache::market::CoinGeckoClient;
use coin_cache::refresh::RefreshJob;
use coin_cache::store::PriceStore;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

async fn get_json(url: &str) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_index() {
    let source = Arc::new(ScriptedSource::default());
    let base = spawn_app(scripted_job(source, PriceStore::new())).await;

    let (status, body) = get_json(&format!("{base}/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"], json!(["/prices", "/update"]));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_prices_after_refresh() {
    let source = Arc::new(ScriptedSource::new(
        &["bitcoin", "ethereum"],
        json!({"bitcoin": {"usd": 50000}, "ethereum": {"usd": 3000}}),
    ));
    let job = scripted_job(source, PriceStore::new());
    job.run().await;
    let base = spawn_app(job).await;

    let (status, body) = get_json(&format!("{base}/prices")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"bitcoin": {"usd": 50000}, "ethereum": {"usd": 3000}})
    );
}

#[tokio::test]
async fn test_prices_is_idempotent() {
    let source = Arc::new(ScriptedSource::default());
    let store = PriceStore::with_snapshot(snapshot(json!({
        "bitcoin": {"usd": 50000.25},
        "solana": {"usd": 140}
    })));
    let base = spawn_app(scripted_job(source, store)).await;

    let first = reqwest::get(format!("{base}/prices")).await.unwrap().bytes().await.unwrap();
    let second = reqwest::get(format!("{base}/prices")).await.unwrap().bytes().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_prices_empty_store() {
    let source = Arc::new(ScriptedSource::default());
    let base = spawn_app(scripted_job(source, PriceStore::new())).await;

    let (status, body) = get_json(&format!("{base}/prices")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_update_returns_new_snapshot() {
    let source = Arc::new(ScriptedSource::new(
        &["bitcoin"],
        json!({"bitcoin": {"usd": 50000}}),
    ));
    let base = spawn_app(scripted_job(source.clone(), PriceStore::new())).await;

    let (status, body) = get_json(&format!("{base}/update")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert_eq!(body["data"], json!({"bitcoin": {"usd": 50000}}));

    // Keys from the previous cycle do not survive the next one
    source.set(&["ethereum"], json!({"ethereum": {"usd": 3000}}));
    let (_, body) = get_json(&format!("{base}/update")).await;
    assert_eq!(body["data"], json!({"ethereum": {"usd": 3000}}));

    let (_, prices) = get_json(&format!("{base}/prices")).await;
    assert_eq!(prices, json!({"ethereum": {"usd": 3000}}));
}

#[tokio::test]
async fn test_update_with_listing_outage_keeps_prices() {
    let source = Arc::new(ScriptedSource::new(&[], json!({})));
    let store = PriceStore::with_snapshot(snapshot(json!({"bitcoin": {"usd": 50000}})));
    let base = spawn_app(scripted_job(source, store)).await;

    let (status, body) = get_json(&format!("{base}/update")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"bitcoin": {"usd": 50000}}));

    let (_, prices) = get_json(&format!("{base}/prices")).await;
    assert_eq!(prices, json!({"bitcoin": {"usd": 50000}}));
}

#[tokio::test]
async fn test_upstream_check_success() {
    let source = Arc::new(ScriptedSource::default());
    let base = spawn_app(scripted_job(source, PriceStore::new())).await;

    let (status, body) = get_json(&format!("{base}/test-coingecko")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["gecko_says"], "(V3) To the Moon!");
}

#[tokio::test]
async fn test_upstream_check_failure() {
    let source = Arc::new(ScriptedSource::default());
    source.fail_ping();
    let base = spawn_app(scripted_job(source, PriceStore::new())).await;

    let (status, body) = get_json(&format!("{base}/test-coingecko")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_unknown_route() {
    let source = Arc::new(ScriptedSource::default());
    let base = spawn_app(scripted_job(source, PriceStore::new())).await;

    let response = reqwest::get(format!("{base}/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_end_to_end_against_stub_upstream() {
    let stub = StubUpstream::with_coins(75);
    let client = CoinGeckoClient::new(UpstreamConfig {
        base_url: stub.spawn().await,
        timeout_secs: 5,
        ..Default::default()
    })
    .unwrap();
    let job = RefreshJob::new(Arc::new(client), Arc::new(PriceStore::new()));
    let base = spawn_app(job).await;

    let (status, body) = get_json(&format!("{base}/update")).await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_object().unwrap();
    assert_eq!(data.len(), 50);
    assert_eq!(data["coin-0"], json!({"usd": 1.0}));
    assert!(!data.contains_key("coin-60"));

    let (status, body) = get_json(&format!("{base}/test-coingecko")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn test_update_completes_after_client_disconnects() {
    let source = Arc::new(
        ScriptedSource::new(&["bitcoin"], json!({"bitcoin": {"usd": 50000}}))
            .with_fetch_delay(Duration::from_millis(500)),
    );
    let job = scripted_job(source, PriceStore::new());
    let store = job.store().clone();
    let base = spawn_app(job).await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let result = client.get(format!("{base}/update")).send().await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(store.len().await, 1);
    assert_eq!(store.snapshot().await["bitcoin"]["usd"], 50000);
}
