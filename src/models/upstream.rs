//! Upstream wire records
//!
//! Only the fields the fetcher reads are modelled; everything else in the
//! upstream documents is ignored during decoding.

use serde::Deserialize;

/// `{name, url}` pair used throughout the upstream API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedRef {
    pub name: String,
    pub url: String,
}

/// Paginated list envelope: `{count, results}`
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope {
    pub count: u32,
    #[serde(default)]
    pub results: Vec<NamedRef>,
}

/// Base entity record (`/pokemon/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
}

impl PokemonRecord {
    /// Official artwork if present, else the default front sprite.
    pub fn thumbnail(&self) -> Option<String> {
        self.sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|art| art.front_default.clone())
            .or_else(|| self.sprites.front_default.clone())
    }

    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<String> {
        let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|slot| slot.slot);
        slots.into_iter().map(|slot| slot.kind.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedRef,
}

/// Species record (`/pokemon-species/{id}`), source of the category label
/// and the lineage-chain reference
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub generation: Option<NamedRef>,
    #[serde(default)]
    pub evolution_chain: Option<UrlRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlRef {
    #[serde(default)]
    pub url: Option<String>,
}

/// Lineage chain (`/evolution-chain/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionChainRecord {
    pub id: u32,
    pub chain: ChainLink,
}

/// One node of the lineage tree
#[derive(Debug, Clone, Deserialize)]
pub struct ChainLink {
    pub species: NamedRef,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

/// Generation record (`/generation/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRecord {
    pub id: u32,
    pub name: String,
}

/// Type record (`/type/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct TypeRecord {
    pub id: u32,
    pub name: String,
}
