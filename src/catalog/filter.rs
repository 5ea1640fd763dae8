//! Filter state and filtering

use serde::Serialize;

use crate::catalog::{ALL, DEFAULT_PAGE_SIZE, ENTITY_ID_SANITY_BOUND};
use crate::models::Entity;

// == Filter State ==
/// Search, filters and pagination position as chosen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    /// Case-insensitive substring over name and lineage names; empty = no-op
    pub search: String,
    /// Type tag the entity must carry, or [`ALL`]
    #[serde(rename = "type")]
    pub type_filter: String,
    /// Exact generation label, or [`ALL`]
    pub generation: String,
    pub items_per_page: usize,
    /// 1-based; may be out of range until the next derivation corrects it
    pub current_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            type_filter: ALL.to_string(),
            generation: ALL.to_string(),
            items_per_page: DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }
}

impl FilterState {
    /// Whether any of search, type or generation narrows the list.
    pub fn has_active_filters(&self) -> bool {
        !self.search.trim().is_empty() || self.type_filter != ALL || self.generation != ALL
    }
}

// == Matching ==
/// Whether `entity` survives the sanity rules and every active filter.
pub fn matches_filter(entity: &Entity, filter: &FilterState) -> bool {
    if entity.has_undefined_generation() || entity.id > ENTITY_ID_SANITY_BOUND {
        return false;
    }

    if filter.type_filter != ALL && !entity.types.iter().any(|t| *t == filter.type_filter) {
        return false;
    }

    if filter.generation != ALL && entity.generation != filter.generation {
        return false;
    }

    let query = filter.search.trim().to_lowercase();
    if !query.is_empty() {
        let name_match = entity.name.to_lowercase().contains(&query);
        let lineage_match = entity
            .lineage
            .iter()
            .any(|name| name.to_lowercase().contains(&query));
        if !name_match && !lineage_match {
            return false;
        }
    }

    true
}

/// Keeps the entities matching `filter`, preserving input order.
pub fn apply_filters<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    filter: &FilterState,
) -> Vec<&'a Entity> {
    entities
        .into_iter()
        .filter(|entity| matches_filter(entity, filter))
        .collect()
}
