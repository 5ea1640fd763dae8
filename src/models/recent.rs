//! Recently-visited entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Entity;

/// A visit to an entity detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentVisit {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
    pub types: Vec<String>,
    pub visited_at: DateTime<Utc>,
}

impl RecentVisit {
    /// Creates a visit stamped with the current time.
    pub fn now(entity: &Entity) -> Self {
        Self::at(entity, Utc::now())
    }

    pub fn at(entity: &Entity, visited_at: DateTime<Utc>) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            sprite: entity.sprite.clone(),
            types: entity.types.clone(),
            visited_at,
        }
    }
}
