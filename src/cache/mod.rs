//! Cache Module
//!
//! The two cache tiers: an LRU response cache keyed by request URL, and an
//! entity cache keyed by identifier that trims by ascending key.

mod entity;
mod lru;
mod response;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entity::{EntityCache, MergeReport};
pub use lru::LruTracker;
pub use response::{Payload, ResponseCache};
pub use stats::CacheStats;
pub use store::ResponseStore;

// == Public Constants ==
/// Default number of upstream responses kept
pub const RESPONSE_CACHE_CAPACITY: usize = 500;

/// Default number of entities kept
pub const ENTITY_CACHE_CAPACITY: usize = 1025;

/// Entities dropped per trim round when the entity cache overflows
pub const TRIM_COUNT: usize = 50;
