//! Integration Tests for API Endpoints
//!
//! Drives the full router against an in-memory upstream catalog.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dexcache::{
    cache::{EntityCache, ResponseCache},
    catalog::CatalogStore,
    create_router,
    recent::{MemoryStore, RecentlyVisited},
    spawn_initial_load,
    upstream::{EntityFetcher, Upstream},
    AppState, DexError,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const BASE: &str = "https://dex.test/api/v2";

// == In-Memory Upstream ==

/// Catalog of `count` entities. Ids 4..=6 form the "char" family, every other
/// id is a single-stage lineage named `mon-{id}`.
struct CatalogUpstream {
    count: u32,
    requests: AtomicUsize,
}

fn name_of(id: u32) -> String {
    match id {
        4 => "charmander".to_string(),
        5 => "charmeleon".to_string(),
        6 => "charizard".to_string(),
        _ => format!("mon-{id}"),
    }
}

impl CatalogUpstream {
    fn new(count: u32) -> Self {
        Self {
            count,
            requests: AtomicUsize::new(0),
        }
    }

    fn resolve(&self, key: &str) -> Option<u32> {
        let id = key
            .parse::<u32>()
            .ok()
            .or_else(|| (1..=self.count).find(|id| name_of(*id) == key))?;
        (1..=self.count).contains(&id).then_some(id)
    }

    fn chain(id: u32) -> Value {
        if (4..=6).contains(&id) {
            json!({ "id": 2, "chain": {
                "species": { "name": "charmander", "url": "u" },
                "evolves_to": [{
                    "species": { "name": "charmeleon", "url": "u" },
                    "evolves_to": [{ "species": { "name": "charizard", "url": "u" }, "evolves_to": [] }]
                }]
            }})
        } else {
            json!({ "id": id, "chain": { "species": { "name": name_of(id), "url": "u" }, "evolves_to": [] } })
        }
    }
}

#[async_trait]
impl Upstream for CatalogUpstream {
    async fn get_json(&self, url: &str) -> dexcache::Result<Value> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let missing = || DexError::status(url, 404, "Not Found");

        let rest = url.strip_prefix(BASE).ok_or_else(missing)?;
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

        match parts.as_slice() {
            ["pokemon"] => {
                let param = |name: &str| {
                    query
                        .split('&')
                        .filter_map(|pair| pair.split_once('='))
                        .find(|(k, _)| *k == name)
                        .and_then(|(_, v)| v.parse::<u32>().ok())
                        .unwrap_or(0)
                };
                let (limit, offset) = (param("limit"), param("offset"));
                let results: Vec<Value> = (offset + 1..=(offset + limit).min(self.count))
                    .map(|id| json!({ "name": name_of(id), "url": format!("{BASE}/pokemon/{id}/") }))
                    .collect();
                Ok(json!({ "count": self.count, "results": results }))
            }
            ["pokemon", key] => {
                let id = self.resolve(key).ok_or_else(missing)?;
                let kind = if (4..=6).contains(&id) { "fire" } else { "normal" };
                Ok(json!({
                    "id": id,
                    "name": name_of(id),
                    "sprites": { "front_default": format!("{id}.png") },
                    "types": [{ "slot": 1, "type": { "name": kind, "url": "u" } }],
                    "stats": [],
                    "height": 1,
                    "weight": 1
                }))
            }
            ["pokemon-species", key] => {
                let id = self.resolve(key).ok_or_else(missing)?;
                Ok(json!({
                    "id": id,
                    "name": name_of(id),
                    "generation": { "name": "generation-i", "url": "u" },
                    "evolution_chain": { "url": format!("{BASE}/evolution-chain/{id}/") }
                }))
            }
            ["evolution-chain", key] => {
                let id = self.resolve(key).ok_or_else(missing)?;
                Ok(Self::chain(id))
            }
            ["type"] => Ok(json!({ "count": 2, "results": [
                { "name": "normal", "url": format!("{BASE}/type/1") },
                { "name": "fire", "url": format!("{BASE}/type/10") }
            ]})),
            ["type", "1"] => Ok(json!({ "id": 1, "name": "normal" })),
            ["type", "10"] => Ok(json!({ "id": 10, "name": "fire" })),
            ["generation"] => Ok(json!({ "count": 1, "results": [
                { "name": "generation-i", "url": format!("{BASE}/generation/1") }
            ]})),
            ["generation", "1"] => Ok(json!({ "id": 1, "name": "generation-i" })),
            _ => Err(missing()),
        }
    }
}

// == Helper Functions ==

async fn create_test_app(count: u32, initial: usize) -> (Router, AppState) {
    let fetcher = EntityFetcher::new(
        Arc::new(CatalogUpstream::new(count)),
        Arc::new(ResponseCache::new(500)),
        BASE,
    );
    let state = AppState::new(
        CatalogStore::new(EntityCache::default()),
        fetcher,
        RecentlyVisited::open(Box::new(MemoryStore::default())),
    );
    spawn_initial_load(state.catalog.clone(), state.fetcher.clone(), initial)
        .await
        .unwrap();

    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn ids(page: &Value) -> Vec<u64> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect()
}

// == Page Endpoint Tests ==

#[tokio::test]
async fn test_first_page() {
    let (app, _) = create_test_app(100, 25).await;

    let (status, page) = send(&app, "GET", "/pokemon", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["status"], "ready");
    assert_eq!(ids(&page), (1..=12).collect::<Vec<u64>>());
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["show_next"], true);
    assert_eq!(page["phase"], "idle");
}

#[tokio::test]
async fn test_out_of_range_page_is_clamped() {
    let (app, _) = create_test_app(100, 25).await;

    let (status, filter) = send(&app, "PUT", "/page/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filter["current_page"], 3);

    let (_, page) = send(&app, "GET", "/pokemon", None).await;
    assert_eq!(page["current_page"], 3);
    assert_eq!(ids(&page), vec![25]);
}

#[tokio::test]
async fn test_search_covers_lineage() {
    let (app, _) = create_test_app(100, 25).await;

    let (status, _) = send(&app, "PUT", "/filters", Some(json!({ "search": "CHAR" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = send(&app, "GET", "/pokemon", None).await;
    assert_eq!(ids(&page), vec![4, 5, 6]);
    assert_eq!(page["filtered_count"], 3);
    assert_eq!(page["search"], "CHAR");
}

#[tokio::test]
async fn test_type_filter_and_clear() {
    let (app, _) = create_test_app(100, 25).await;

    send(&app, "PUT", "/filters", Some(json!({ "type": "fire" }))).await;
    let (_, page) = send(&app, "GET", "/pokemon", None).await;
    assert_eq!(ids(&page), vec![4, 5, 6]);

    let (status, filter) = send(&app, "DELETE", "/filters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filter["type"], "all");

    let (_, page) = send(&app, "GET", "/pokemon", None).await;
    assert_eq!(page["filtered_count"], 25);
}

#[tokio::test]
async fn test_invalid_page_size() {
    let (app, _) = create_test_app(100, 25).await;

    let (status, body) = send(&app, "PUT", "/filters", Some(json!({ "items_per_page": 7 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("items_per_page"));
}

#[tokio::test]
async fn test_page_size_change_returns_to_first_page() {
    let (app, _) = create_test_app(100, 60).await;

    send(&app, "PUT", "/page/2", None).await;
    let (_, filter) = send(&app, "PUT", "/filters", Some(json!({ "items_per_page": 20 }))).await;
    assert_eq!(filter["current_page"], 1);

    let (_, page) = send(&app, "GET", "/pokemon", None).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_last_page() {
    let (app, _) = create_test_app(100, 30).await;

    let (_, filter) = send(&app, "PUT", "/last-page", None).await;
    assert_eq!(filter["current_page"], 3);
}

#[tokio::test]
async fn test_pager_hidden_at_max_key() {
    let (app, _) = create_test_app(100, 60).await;

    send(&app, "PUT", "/page/5", None).await;
    let (_, page) = send(&app, "GET", "/pokemon", None).await;

    assert_eq!(page["current_page"], 5);
    assert_eq!(page["show_next"], false);
}

// == Refill Tests ==

#[tokio::test]
async fn test_deep_page_refills_catalog() {
    let (app, state) = create_test_app(300, 60).await;

    send(&app, "PUT", "/page/4", None).await;

    // Wait for the detached refill to merge
    for _ in 0..100 {
        if state.catalog.read().await.refills_in_flight() == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["max_key"], 200);
    assert_eq!(stats["entities"], 110);
    assert_eq!(stats["phase"], "idle");
}

// == Detail And Recent Tests ==

#[tokio::test]
async fn test_detail_records_visit() {
    let (app, _) = create_test_app(100, 25).await;

    let (status, detail) = send(&app, "GET", "/pokemon/charmeleon", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["entity"]["id"], 5);
    assert_eq!(
        detail["entity"]["lineage"],
        json!(["charmander", "charmeleon", "charizard"])
    );
    assert_eq!(detail["lineage_members"].as_array().unwrap().len(), 3);

    send(&app, "GET", "/pokemon/7", None).await;
    send(&app, "GET", "/pokemon/5", None).await;

    let (_, recent) = send(&app, "GET", "/recent", None).await;
    let visited: Vec<u64> = recent["visits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_u64().unwrap())
        .collect();
    assert_eq!(visited, vec![5, 7]);

    let (status, _) = send(&app, "DELETE", "/recent", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, recent) = send(&app, "GET", "/recent", None).await;
    assert!(recent["visits"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_detail_not_found() {
    let (app, _) = create_test_app(100, 25).await;

    let (status, body) = send(&app, "GET", "/pokemon/missingno", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("error").is_some());
}

// == Options, Snapshot, Stats, Health ==

#[tokio::test]
async fn test_filter_options() {
    let (app, _) = create_test_app(100, 25).await;

    let (status, options) = send(&app, "GET", "/filters/options", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(options["types"], json!(["normal", "fire"]));
    assert_eq!(options["generations"][0]["label"], "Gen I");
    assert_eq!(options["page_sizes"], json!([12, 20, 36, 50]));
}

#[tokio::test]
async fn test_snapshot_is_sorted() {
    let (app, _) = create_test_app(100, 25).await;

    let (status, all) = send(&app, "GET", "/pokemon/all", None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, (1..=25).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_stats_endpoint() {
    let (app, _) = create_test_app(100, 25).await;

    let (status, stats) = send(&app, "GET", "/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["entities"], 25);
    assert_eq!(stats["max_key"], 25);
    assert!(stats["responses"]["misses"].as_u64().unwrap() > 0);
    assert!(stats.get("hit_rate").is_some());
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app(10, 5).await;

    let (status, health) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_invalid_json_request() {
    let (app, _) = create_test_app(10, 5).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/filters")
                .header("content-type", "application/json")
                .body(Body::from("{invalid json}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
