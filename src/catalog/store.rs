//! Catalog store
//!
//! Owns the entity cache, the client's filter state and the bookkeeping for
//! the initial load and background refills. Shared as
//! `Arc<RwLock<CatalogStore>>`; nothing in here performs I/O, so holding the
//! lock never spans an upstream call.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{EntityCache, MergeReport};
use crate::catalog::view::{self, PageCorrection, PageView};
use crate::catalog::{
    FilterState, ALL, MAX_REFILL_OFFSET, PAGE_SIZES, REFILL_BATCH, REFILL_LOOKAHEAD_PAGE,
};
use crate::error::{DexError, Result};
use crate::models::{Entity, FilterUpdate};
use crate::upstream::FilterOptions;

// == Load State ==
/// Progress of the initial catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Terminal; the message is shown instead of an empty catalog
    Failed(String),
}

impl LoadState {
    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Loading => "loading",
            LoadState::Ready => "ready",
            LoadState::Failed(_) => "failed",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }
}

/// Whether a background refill is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    FetchingMore,
}

// == Refill Window ==
/// Listing slice requested by one refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RefillWindow {
    pub offset: usize,
    pub limit: usize,
}

impl RefillWindow {
    /// Window for a committed page: `limit = max(50, per_page)`,
    /// `offset = min((page - 1) * limit, 1301)`.
    pub fn for_page(page: usize, per_page: usize) -> Self {
        let limit = REFILL_BATCH.max(per_page);
        let offset = page
            .saturating_sub(1)
            .saturating_mul(limit)
            .min(MAX_REFILL_OFFSET);
        Self { offset, limit }
    }
}

// == Catalog Store ==
#[derive(Debug)]
pub struct CatalogStore {
    entities: EntityCache,
    filter: FilterState,
    load_state: LoadState,
    options: FilterOptions,
    /// Windows with a refill in flight
    refills: HashSet<RefillWindow>,
    last_refill_error: Option<String>,
}

impl CatalogStore {
    // == Constructor ==
    /// Creates a store around an (usually empty) entity cache, in the
    /// loading state with default filters.
    pub fn new(entities: EntityCache) -> Self {
        Self {
            entities,
            filter: FilterState::default(),
            load_state: LoadState::Loading,
            options: FilterOptions::default(),
            refills: HashSet::new(),
            last_refill_error: None,
        }
    }

    pub fn entities(&self) -> &EntityCache {
        &self.entities
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn last_refill_error(&self) -> Option<&str> {
        self.last_refill_error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        if self.refills.is_empty() {
            Phase::Idle
        } else {
            Phase::FetchingMore
        }
    }

    // == Derivation ==
    /// Derives the active page from the cached entities. Does not commit any
    /// correction; see [`apply_correction`](Self::apply_correction).
    pub fn derive_view(&self) -> PageView {
        view::derive_view(self.entities.iter_sorted(), &self.filter)
    }

    /// Commits a clamp correction if the stored page is still the one it was
    /// computed from. Returns whether the page changed.
    pub fn apply_correction(&mut self, correction: PageCorrection) -> bool {
        if self.filter.current_page != correction.from || correction.from == correction.to {
            return false;
        }
        self.filter.current_page = correction.to;
        true
    }

    /// Forward-navigation flag for the committed page.
    pub fn show_next(&self) -> bool {
        view::show_next(
            self.filter.current_page,
            self.filter.items_per_page,
            self.entities.max_key(),
        )
    }

    // == Filter Setters ==
    // Every filter change returns to the first page.

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.filter.current_page = 1;
    }

    pub fn set_type_filter(&mut self, type_filter: impl Into<String>) {
        self.filter.type_filter = type_filter.into();
        self.filter.current_page = 1;
    }

    pub fn set_generation(&mut self, generation: impl Into<String>) {
        self.filter.generation = generation.into();
        self.filter.current_page = 1;
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) -> Result<()> {
        if !PAGE_SIZES.contains(&items_per_page) {
            return Err(DexError::InvalidRequest(format!(
                "items_per_page must be one of {PAGE_SIZES:?}, got {items_per_page}"
            )));
        }
        self.filter.items_per_page = items_per_page;
        self.filter.current_page = 1;
        Ok(())
    }

    /// Applies the fields present in `update`, validating all of them first.
    pub fn apply_update(&mut self, update: FilterUpdate) -> Result<()> {
        if let Some(message) = update.validate() {
            return Err(DexError::InvalidRequest(message));
        }
        if let Some(size) = update.items_per_page {
            self.set_items_per_page(size)?;
        }
        if let Some(search) = update.search {
            self.set_search(search);
        }
        if let Some(type_filter) = update.type_filter {
            self.set_type_filter(type_filter);
        }
        if let Some(generation) = update.generation {
            self.set_generation(generation);
        }
        Ok(())
    }

    /// Resets search, type and generation. Page size is kept.
    pub fn clear_filters(&mut self) {
        self.filter.search.clear();
        self.filter.type_filter = ALL.to_string();
        self.filter.generation = ALL.to_string();
        self.filter.current_page = 1;
    }

    // == Navigation ==
    /// Stores the requested page as-is; the next derivation clamps it.
    pub fn set_current_page(&mut self, page: usize) {
        self.filter.current_page = page;
    }

    /// Jumps to the last page of the whole cached catalog and returns it.
    pub fn set_last_page(&mut self) -> usize {
        let last = view::total_pages(self.entities.len(), self.filter.items_per_page);
        self.filter.current_page = last;
        last
    }

    // == Initial Load ==
    pub fn begin_loading(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Installs the initial entity list and filter options, or records the
    /// failure as the terminal load state.
    pub fn finish_initial_load(&mut self, result: Result<(Vec<Entity>, FilterOptions)>) {
        match result {
            Ok((entities, options)) => {
                let count = entities.len();
                self.entities.load_initial(entities);
                self.options = options;
                self.load_state = LoadState::Ready;
                info!(
                    count,
                    cached = self.entities.len(),
                    max_key = self.entities.max_key(),
                    "initial catalog load complete"
                );
            }
            Err(err) => {
                warn!(error = %err, "initial catalog load failed");
                self.load_state = LoadState::Failed(err.to_string());
            }
        }
    }

    // == Refill ==
    /// Window to fetch for the committed page, if it is past the lookahead
    /// threshold and the catalog is ready.
    pub fn refill_window(&self) -> Option<RefillWindow> {
        if !self.load_state.is_ready() || self.filter.current_page <= REFILL_LOOKAHEAD_PAGE {
            return None;
        }
        Some(RefillWindow::for_page(
            self.filter.current_page,
            self.filter.items_per_page,
        ))
    }

    /// Marks `window` in flight. Returns false if it already was.
    pub fn try_begin_refill(&mut self, window: RefillWindow) -> bool {
        self.refills.insert(window)
    }

    /// Finishes the refill for `window`. A successful batch is merged into the
    /// entity cache; a failure is kept as `last_refill_error` and leaves the
    /// cached pages untouched.
    pub fn complete_refill(
        &mut self,
        window: RefillWindow,
        result: Result<Vec<Entity>>,
    ) -> Option<MergeReport> {
        self.refills.remove(&window);

        match result {
            Ok(batch) => {
                let report = self.entities.merge_batch(batch);
                self.last_refill_error = None;
                info!(
                    offset = window.offset,
                    limit = window.limit,
                    inserted = report.inserted,
                    replaced = report.replaced,
                    trimmed = report.trimmed.len(),
                    "refill merged"
                );
                Some(report)
            }
            Err(err) => {
                warn!(
                    offset = window.offset,
                    limit = window.limit,
                    error = %err,
                    "refill failed"
                );
                self.last_refill_error = Some(err.to_string());
                None
            }
        }
    }

    /// Number of refills in flight.
    pub fn refills_in_flight(&self) -> usize {
        self.refills.len()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(EntityCache::default())
    }
}
