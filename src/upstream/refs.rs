//! Reference strings and labels
//!
//! Upstream links records through URL-shaped references such as
//! `https://pokeapi.co/api/v2/evolution-chain/10/`. The helpers here pull
//! identifiers out of them and format the generation label.

use std::fmt;

use crate::error::{DexError, Result};
use crate::models::UNDEFINED_GENERATION;
use crate::upstream::SPECIES_ID_BOUND;

// == Entity Key ==
/// How an entity is addressed upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Id(u32),
    Name(String),
}

impl EntityKey {
    /// Parses a path segment: all digits is an id, anything else a name.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DexError::InvalidRequest("empty entity key".to_string()));
        }
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw
                .parse()
                .map(EntityKey::Id)
                .map_err(|_| DexError::InvalidRequest(format!("id out of range: {raw}")));
        }
        Ok(EntityKey::Name(raw.to_lowercase()))
    }

    /// Path segment for species lookups. Numeric ids outside
    /// `1..=SPECIES_ID_BOUND` resolve to the bound.
    pub fn species_segment(&self) -> String {
        match self {
            EntityKey::Id(id) if *id < 1 || *id > SPECIES_ID_BOUND => SPECIES_ID_BOUND.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Id(id) => write!(f, "{id}"),
            EntityKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for EntityKey {
    fn from(id: u32) -> Self {
        EntityKey::Id(id)
    }
}

// == Reference Id ==
/// Extracts the numeric id following `/{segment}/` in `url`.
///
/// ```
/// use dexcache::upstream::refs::reference_id;
/// let id = reference_id("https://pokeapi.co/api/v2/evolution-chain/67/", "evolution-chain");
/// assert_eq!(id.unwrap(), 67);
/// ```
pub fn reference_id(url: &str, segment: &str) -> Result<u32> {
    let marker = format!("/{segment}/");
    let start = url
        .find(&marker)
        .map(|pos| pos + marker.len())
        .ok_or_else(|| DexError::MalformedReference(url.to_string()))?;

    url[start..]
        .split('/')
        .next()
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| DexError::MalformedReference(url.to_string()))
}

// == Generation Label ==
/// `generation-iii` becomes `Gen III`; a missing name becomes the undefined
/// sentinel.
pub fn format_generation_name(name: Option<&str>) -> String {
    match name {
        Some(name) => {
            let numeral = name.strip_prefix("generation-").unwrap_or(name);
            format!("Gen {}", numeral.to_uppercase())
        }
        None => UNDEFINED_GENERATION.to_string(),
    }
}
