//! Dexcache - caching and incremental-fetch engine for a paginated creature
//! catalog
//!
//! A URL-keyed response cache with LRU eviction and single-flight loads sits
//! in front of the upstream API; an id-keyed entity cache holds the enriched
//! entities the pagination/filter engine pages through.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod recent;
pub mod tasks;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{DexError, Result};
pub use tasks::spawn_initial_load;
