//! Enriched catalog entity

use serde::{Deserialize, Serialize};

use crate::models::upstream::PokemonRecord;

/// Category label given to records whose species carries no generation.
/// Such records never reach a page.
pub const UNDEFINED_GENERATION: &str = "Gen undefined";

// == Entity ==
/// One catalog record augmented with its category label and lineage.
///
/// Entities are never mutated; the entity cache replaces them by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
    /// Type tags in slot order
    pub types: Vec<String>,
    pub stats: Vec<Stat>,
    pub height: u32,
    pub weight: u32,
    /// Category label, e.g. "Gen III"
    pub generation: String,
    /// Names of the derivation chain, parents before children.
    /// Always contains `name`.
    pub lineage: Vec<String>,
}

/// Base stat value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub base: u32,
}

impl Entity {
    // == Constructor ==
    /// Merges a base record with its derived label and flattened lineage.
    pub fn from_parts(record: PokemonRecord, generation: String, mut lineage: Vec<String>) -> Self {
        if !lineage.iter().any(|name| *name == record.name) {
            lineage.push(record.name.clone());
        }

        Self {
            id: record.id,
            sprite: record.thumbnail(),
            types: record.type_names(),
            stats: record
                .stats
                .iter()
                .map(|slot| Stat {
                    name: slot.stat.name.clone(),
                    base: slot.base_stat,
                })
                .collect(),
            height: record.height,
            weight: record.weight,
            name: record.name,
            generation,
            lineage,
        }
    }

    /// Whether the category label is the undefined sentinel.
    pub fn has_undefined_generation(&self) -> bool {
        self.generation == UNDEFINED_GENERATION
    }
}
