//! Entity Cache Module
//!
//! Identifier-keyed store of enriched entities. Grows through batch merges and
//! trims itself by ascending key (not recency) once it passes its ceiling.

use std::collections::BTreeMap;

use tracing::debug;

use crate::cache::{ENTITY_CACHE_CAPACITY, TRIM_COUNT};
use crate::models::Entity;

// == Merge Report ==
/// Outcome of a [`EntityCache::merge_batch`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Identifiers that were not cached before the merge
    pub inserted: usize,
    /// Identifiers whose entity was overwritten
    pub replaced: usize,
    /// Identifiers removed by the capacity trim, ascending
    pub trimmed: Vec<u32>,
}

// == Entity Cache ==
/// Capacity-bounded `id -> Entity` map with bulk smallest-key trimming.
#[derive(Debug, Clone)]
pub struct EntityCache {
    /// Entities ordered by identifier
    entries: BTreeMap<u32, Entity>,
    /// Maximum entities kept after a merge
    capacity: usize,
    /// Entities dropped per trim round
    trim_count: usize,
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new(ENTITY_CACHE_CAPACITY, TRIM_COUNT)
    }
}

impl EntityCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entities after any merge
    /// * `trim_count` - Number of smallest identifiers dropped per overflow round
    pub fn new(capacity: usize, trim_count: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity: capacity.max(1),
            trim_count: trim_count.max(1),
        }
    }

    // == Load Initial ==
    /// Replaces the whole cache with `entities`.
    ///
    /// Returns the identifiers trimmed if the list was larger than capacity.
    pub fn load_initial(&mut self, entities: impl IntoIterator<Item = Entity>) -> Vec<u32> {
        self.entries = entities
            .into_iter()
            .map(|entity| (entity.id, entity))
            .collect();
        self.trim()
    }

    // == Merge Batch ==
    /// Upserts every entity by identifier, then enforces capacity.
    ///
    /// Trimming removes the smallest identifiers present, including ones that
    /// arrived in this very batch.
    pub fn merge_batch(&mut self, entities: impl IntoIterator<Item = Entity>) -> MergeReport {
        let mut report = MergeReport::default();

        for entity in entities {
            match self.entries.insert(entity.id, entity) {
                Some(_) => report.replaced += 1,
                None => report.inserted += 1,
            }
        }

        report.trimmed = self.trim();
        report
    }

    // == Snapshot Sorted ==
    /// All entities ordered ascending by identifier.
    pub fn snapshot_sorted(&self) -> Vec<Entity> {
        self.entries.values().cloned().collect()
    }

    /// Borrowing form of [`snapshot_sorted`](Self::snapshot_sorted).
    pub fn iter_sorted(&self) -> impl Iterator<Item = &Entity> {
        self.entries.values()
    }

    // == Max Key ==
    /// Greatest cached identifier, or 0 when empty.
    pub fn max_key(&self) -> u32 {
        self.entries.keys().next_back().copied().unwrap_or(0)
    }

    /// Smallest cached identifier, or 0 when empty.
    pub fn min_key(&self) -> u32 {
        self.entries.keys().next().copied().unwrap_or(0)
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
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

    pub fn trim_count(&self) -> usize {
        self.trim_count
    }

    // == Trim ==
    /// Drops `trim_count` smallest identifiers per round until within capacity.
    fn trim(&mut self) -> Vec<u32> {
        let mut trimmed = Vec::new();

        while self.entries.len() > self.capacity {
            for _ in 0..self.trim_count {
                match self.entries.pop_first() {
                    Some((id, _)) => trimmed.push(id),
                    None => break,
                }
            }
        }

        if !trimmed.is_empty() {
            debug!(
                count = trimmed.len(),
                remaining = self.entries.len(),
                "trimmed entity cache"
            );
        }
        trimmed
    }
}
