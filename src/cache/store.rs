//! Response Store Module
//!
//! Synchronous core of the response cache: a HashMap of payloads kept in
//! step with an LRU tracker and a fixed capacity.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheStats, LruTracker};

// == Response Store ==
/// Capacity-bounded payload storage with LRU eviction.
#[derive(Debug)]
pub struct ResponseStore<V> {
    /// Key-payload storage
    entries: HashMap<String, V>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<V: Clone> ResponseStore<V> {
    // == Constructor ==
    /// Creates a new store holding at most `capacity` payloads.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity: capacity.max(1),
        }
    }

    // == Get ==
    /// Returns the payload for `key` and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                let value = value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Refresh ==
    /// Returns the payload and marks it most recently used, without
    /// counting a hit or miss.
    pub fn refresh(&mut self, key: &str) -> Option<V> {
        let value = self.entries.get(key)?.clone();
        self.lru.touch(key);
        Some(value)
    }

    // == Peek ==
    /// Returns the payload without touching recency or stats.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    // == Insert ==
    /// Stores a payload as the newest entry.
    ///
    /// A new key first evicts oldest entries until `len < capacity`, so the
    /// insert itself never overflows.
    pub fn insert(&mut self, key: String, value: V) {
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                match self.lru.evict_oldest() {
                    Some(evicted) => {
                        self.entries.remove(&evicted);
                        self.stats.record_eviction();
                        debug!(key = %evicted, "evicted response");
                    }
                    None => break,
                }
            }
        }

        self.entries.insert(key.clone(), value);
        self.lru.touch(&key);
    }

    // == Record Failure ==
    pub fn record_load_failure(&mut self) {
        self.stats.record_load_failure();
    }

    // == Clear ==
    /// Drops every payload. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Oldest ==
    /// Next eviction candidate.
    pub fn oldest_key(&self) -> Option<&str> {
        self.lru.peek_oldest()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len(), self.capacity)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
