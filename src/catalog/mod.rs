//! Catalog Module
//!
//! The pagination/filter engine: filter state, page derivation with its
//! clamp correction, and the store that owns the entity cache and decides
//! when the background refill runs.

mod filter;
mod store;
mod view;


pub use filter::{apply_filters, matches_filter, FilterState};
pub use store::{CatalogStore, LoadState, Phase, RefillWindow};
pub use view::{
    clamp_page, derive_view, page_items, show_next, total_pages, PageCorrection, PageItem,
    PageView,
};

// == Public Constants ==
/// Sentinel meaning "no restriction" for the type and generation filters
pub const ALL: &str = "all";

/// Selectable page sizes
pub const PAGE_SIZES: &[usize] = &[12, 20, 36, 50];

/// Page size on startup and after a reset
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Committed pages beyond this one trigger a background refill
pub const REFILL_LOOKAHEAD_PAGE: usize = 3;

/// Entities listed per refill request (at least; a larger page size wins)
pub const REFILL_BATCH: usize = 50;

/// Highest listing offset a refill asks for
pub const MAX_REFILL_OFFSET: usize = 1301;

/// Identifiers above this are placeholder/alternate-form records and are
/// never shown
pub const ENTITY_ID_SANITY_BOUND: u32 = 10_000;
