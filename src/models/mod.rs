//! Data models for the catalog service
//!
//! Upstream wire records, the enriched [`Entity`], recently-visited entries
//! and the DTOs used for HTTP request and response bodies.

pub mod entity;
pub mod recent;
pub mod requests;
pub mod responses;
pub mod upstream;

// Re-export commonly used types
pub use entity::{Entity, Stat, UNDEFINED_GENERATION};
pub use recent::RecentVisit;
pub use requests::{FilterUpdate, PageQuery};
pub use responses::{
    EntityDetailResponse, FilterOptionsResponse, GenerationOption, HealthResponse,
    LineageMember, PageResponse, RecentResponse, StatsResponse,
};
pub use upstream::{
    ChainLink, EvolutionChainRecord, GenerationRecord, ListEnvelope, NamedRef, PokemonRecord,
    SpeciesRecord, TypeRecord,
};
