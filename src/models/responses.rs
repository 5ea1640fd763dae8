//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::catalog::{LoadState, PageItem, PageView, Phase};
use crate::models::{Entity, RecentVisit};
use crate::upstream::refs::format_generation_name;
use crate::upstream::FilterOptions;

/// Response body for the page endpoint (GET /pokemon)
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    /// "loading", "ready" or "failed"
    pub status: &'static str,
    /// Initial-load failure message, if any
    pub error: Option<String>,
    /// Entities on the active page, ascending by id
    pub items: Vec<Entity>,
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub filtered_count: usize,
    /// Whether forward navigation is offered
    pub show_next: bool,
    /// Page buttons, `null` marking an ellipsis
    pub page_items: Vec<Option<usize>>,
    pub search: String,
    #[serde(rename = "type")]
    pub type_filter: String,
    pub generation: String,
    /// Idle or fetching more entities in the background
    pub phase: Phase,
    /// Last background refill failure, cleared by the next success
    pub refill_error: Option<String>,
}

impl PageResponse {
    /// Assembles the page body from a derived view and store state.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        view: PageView,
        load_state: &LoadState,
        show_next: bool,
        page_items: &[PageItem],
        search: &str,
        type_filter: &str,
        generation: &str,
        phase: Phase,
        refill_error: Option<String>,
    ) -> Self {
        Self {
            status: load_state.label(),
            error: load_state.error().map(str::to_string),
            current_page: view.current_page,
            total_pages: view.total_pages,
            items_per_page: view.items_per_page,
            start_index: view.start_index,
            end_index: view.end_index,
            filtered_count: view.filtered_count,
            items: view.items,
            show_next,
            page_items: page_items.iter().map(PageItem::number).collect(),
            search: search.to_string(),
            type_filter: type_filter.to_string(),
            generation: generation.to_string(),
            phase,
            refill_error,
        }
    }
}

/// Lineage entry resolved for the detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineageMember {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
}

/// Response body for the detail endpoint (GET /pokemon/:key)
#[derive(Debug, Clone, Serialize)]
pub struct EntityDetailResponse {
    pub entity: Entity,
    pub lineage_members: Vec<LineageMember>,
}

/// Generation choice with its display label
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOption {
    pub id: u32,
    pub name: String,
    /// e.g. "Gen III", the value the generation filter matches
    pub label: String,
}

/// Response body for GET /filters/options
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptionsResponse {
    pub types: Vec<String>,
    pub generations: Vec<GenerationOption>,
    pub page_sizes: &'static [usize],
}

impl FilterOptionsResponse {
    pub fn new(options: &FilterOptions, page_sizes: &'static [usize]) -> Self {
        Self {
            types: options.types.iter().map(|t| t.name.clone()).collect(),
            generations: options
                .generations
                .iter()
                .map(|g| GenerationOption {
                    id: g.id,
                    name: g.name.clone(),
                    label: format_generation_name(Some(&g.name)),
                })
                .collect(),
            page_sizes,
        }
    }
}

/// Response body for GET /recent
#[derive(Debug, Clone, Serialize)]
pub struct RecentResponse {
    pub visits: Vec<RecentVisit>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Response cache counters
    pub responses: CacheStats,
    /// Response cache hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Entities currently cached
    pub entities: usize,
    /// Greatest cached identifier, 0 when empty
    pub max_key: u32,
    pub phase: Phase,
}

impl StatsResponse {
    pub fn new(responses: CacheStats, entities: usize, max_key: u32, phase: Phase) -> Self {
        Self {
            hit_rate: responses.hit_rate(),
            responses,
            entities,
            max_key,
            phase,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
