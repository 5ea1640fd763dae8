//! Response cache counters
//!
//! Counters live inside the store; [`CacheStats::snapshot`] stamps them with
//! the occupancy at the moment they are read.

use serde::Serialize;

/// Counters for the response cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to go upstream
    pub misses: u64,
    /// Entries pushed out as least recently used
    pub evictions: u64,
    /// Upstream loads that failed and were not cached
    pub load_failures: u64,
    /// Entries held when the snapshot was taken
    pub total_entries: usize,
    /// Configured ceiling
    pub capacity: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters plus current occupancy.
    pub fn snapshot(&self, total_entries: usize, capacity: usize) -> Self {
        Self {
            total_entries,
            capacity,
            ..*self
        }
    }

    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// hits / lookups, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_load_failure(&mut self) {
        self.load_failures += 1;
    }
}
