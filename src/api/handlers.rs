//! API Handlers
//!
//! HTTP request handlers for each catalog endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use crate::cache::{EntityCache, ResponseCache};
use crate::catalog::{page_items, CatalogStore, FilterState, LoadState, PAGE_SIZES};
use crate::config::Config;
use crate::error::{DexError, Result};
use crate::models::{
    Entity, EntityDetailResponse, FilterOptionsResponse, FilterUpdate, HealthResponse, PageQuery,
    PageResponse, RecentResponse, RecentVisit, StatsResponse,
};
use crate::recent::{JsonFileStore, RecentlyVisited};
use crate::tasks::maybe_schedule_refill;
use crate::upstream::{EntityFetcher, EntityKey, HttpUpstream, Upstream};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Entity cache, filter state and refill bookkeeping
    pub catalog: Arc<RwLock<CatalogStore>>,
    /// Entity fetcher over the shared response cache
    pub fetcher: EntityFetcher,
    pub recent: Arc<RecentlyVisited>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(catalog: CatalogStore, fetcher: EntityFetcher, recent: RecentlyVisited) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            fetcher,
            recent: Arc::new(recent),
        }
    }

    /// Creates a new AppState from configuration, talking to the real
    /// upstream over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let upstream = HttpUpstream::new(config.fetch_timeout())?;
        Ok(Self::with_upstream(config, Arc::new(upstream)))
    }

    /// Same as [`from_config`](Self::from_config) with a caller-supplied
    /// upstream.
    pub fn with_upstream(config: &Config, upstream: Arc<dyn Upstream>) -> Self {
        let responses = Arc::new(ResponseCache::new(config.response_cache_capacity));
        let fetcher = EntityFetcher::new(upstream, responses, config.upstream_base_url.clone());
        let catalog = CatalogStore::new(EntityCache::new(
            config.entity_cache_capacity,
            crate::cache::TRIM_COUNT,
        ));
        let recent =
            RecentlyVisited::open(Box::new(JsonFileStore::new(&config.recent_visits_path)));
        Self::new(catalog, fetcher, recent)
    }
}

/// Fails with `NotReady` unless the initial load has completed.
fn ensure_ready(state: &LoadState) -> Result<()> {
    match state {
        LoadState::Ready => Ok(()),
        LoadState::Loading => Err(DexError::NotReady("catalog is still loading".to_string())),
        LoadState::Failed(message) => Err(DexError::NotReady(format!(
            "initial catalog load failed: {message}"
        ))),
    }
}

/// Derives the page, commits any clamp correction and schedules a refill
/// for the committed page if one is due.
async fn settle_page(state: &AppState) {
    let correction = state.catalog.read().await.derive_view().correction;
    if let Some(correction) = correction {
        if state.catalog.write().await.apply_correction(correction) {
            debug!(from = correction.from, to = correction.to, "clamped page");
        }
    }

    maybe_schedule_refill(&state.catalog, &state.fetcher).await;
}

/// Handler for GET /pokemon
///
/// Returns the active page for the current filters. While the catalog is
/// loading (or after it failed) the page is empty and `status` says why.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<PageResponse> {
    settle_page(&state).await;

    let store = state.catalog.read().await;
    let view = store.derive_view();
    let items = page_items(view.current_page, view.total_pages, query.compact);
    let filter = store.filter();

    Json(PageResponse::new(
        view,
        store.load_state(),
        store.show_next(),
        &items,
        &filter.search,
        &filter.type_filter,
        &filter.generation,
        store.phase(),
        store.last_refill_error().map(str::to_string),
    ))
}

/// Handler for GET /pokemon/all
///
/// Every cached entity, ascending by id.
pub async fn all_handler(State(state): State<AppState>) -> Result<Json<Vec<Entity>>> {
    let store = state.catalog.read().await;
    ensure_ready(store.load_state())?;
    Ok(Json(store.entities().snapshot_sorted()))
}

/// Handler for GET /pokemon/:key
///
/// Serves an entity by id or name, from the entity cache when present and
/// built through the fetcher otherwise. The visit is recorded in the ledger.
pub async fn detail_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntityDetailResponse>> {
    let key = EntityKey::parse(&key)?;

    let cached = {
        let store = state.catalog.read().await;
        cached_entity(store.entities(), &key)
    };
    let entity = match cached {
        Some(entity) => entity,
        None => state.fetcher.build_entity(&key).await?,
    };

    let lineage_members = state.fetcher.lineage_members(&entity).await;

    // The page is still served when the ledger cannot be written
    if let Err(err) = state.recent.record(RecentVisit::now(&entity)).await {
        debug!(id = entity.id, error = %err, "visit kept in memory only");
    }

    Ok(Json(EntityDetailResponse {
        entity,
        lineage_members,
    }))
}

fn cached_entity(entities: &EntityCache, key: &EntityKey) -> Option<Entity> {
    match key {
        EntityKey::Id(id) => entities.get(*id).cloned(),
        EntityKey::Name(name) => entities.iter_sorted().find(|e| e.name == *name).cloned(),
    }
}

/// Handler for PUT /filters
///
/// Applies the fields present in the body and returns to page 1.
pub async fn update_filters_handler(
    State(state): State<AppState>,
    Json(update): Json<FilterUpdate>,
) -> Result<Json<FilterState>> {
    let mut store = state.catalog.write().await;
    store.apply_update(update)?;
    Ok(Json(store.filter().clone()))
}

/// Handler for DELETE /filters
pub async fn clear_filters_handler(State(state): State<AppState>) -> Json<FilterState> {
    let mut store = state.catalog.write().await;
    store.clear_filters();
    Json(store.filter().clone())
}

/// Handler for PUT /page/:page
///
/// Out-of-range pages are clamped before the response is built.
pub async fn set_page_handler(
    State(state): State<AppState>,
    Path(page): Path<usize>,
) -> Json<FilterState> {
    state.catalog.write().await.set_current_page(page);
    settle_page(&state).await;
    Json(state.catalog.read().await.filter().clone())
}

/// Handler for PUT /last-page
///
/// Jumps to the last page of the whole cached catalog.
pub async fn last_page_handler(State(state): State<AppState>) -> Json<FilterState> {
    state.catalog.write().await.set_last_page();
    settle_page(&state).await;
    Json(state.catalog.read().await.filter().clone())
}

/// Handler for GET /filters/options
pub async fn filter_options_handler(
    State(state): State<AppState>,
) -> Result<Json<FilterOptionsResponse>> {
    let store = state.catalog.read().await;
    ensure_ready(store.load_state())?;
    Ok(Json(FilterOptionsResponse::new(store.options(), PAGE_SIZES)))
}

/// Handler for GET /recent
pub async fn recent_handler(State(state): State<AppState>) -> Json<RecentResponse> {
    Json(RecentResponse {
        visits: state.recent.load().await,
    })
}

/// Handler for DELETE /recent
pub async fn clear_recent_handler(State(state): State<AppState>) -> Result<Json<RecentResponse>> {
    state.recent.clear().await?;
    Ok(Json(RecentResponse { visits: Vec::new() }))
}

/// Handler for GET /stats
///
/// Response cache counters plus entity cache size and refill phase.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let responses = state.fetcher.responses().stats().await;

    let store = state.catalog.read().await;
    Json(StatsResponse::new(
        responses,
        store.entities().len(),
        store.entities().max_key(),
        store.phase(),
    ))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
