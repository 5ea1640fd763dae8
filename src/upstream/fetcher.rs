//! Entity Fetcher
//!
//! Builds enriched entities from the three upstream documents they depend on
//! (base record, species record, lineage chain). Every call goes through the
//! shared [`ResponseCache`], so entities that share a chain or a species
//! only hit the network once.

use std::sync::Arc;

use futures_util::future::{join_all, try_join_all};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::{Payload, ResponseCache};
use crate::error::Result;
use crate::models::{
    Entity, EvolutionChainRecord, GenerationRecord, LineageMember, ListEnvelope, PokemonRecord,
    SpeciesRecord, TypeRecord,
};
use crate::upstream::refs::{self, EntityKey};
use crate::upstream::{lineage, Upstream, MAIN_TYPE_MAX_ID, PLACEHOLDER_CHAIN_ID};

/// Choices offered by the type and generation filters.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Main types only, ascending by id
    pub types: Vec<TypeRecord>,
    /// Ascending by id
    pub generations: Vec<GenerationRecord>,
}

// == Entity Fetcher ==
/// Resolves entities and listings through the response cache.
#[derive(Clone)]
pub struct EntityFetcher {
    upstream: Arc<dyn Upstream>,
    responses: Arc<ResponseCache<Payload>>,
    base_url: String,
}

impl EntityFetcher {
    // == Constructor ==
    /// # Arguments
    /// * `upstream` - Transport used on cache misses
    /// * `responses` - Shared response cache
    /// * `base_url` - Catalog API root, e.g. `https://pokeapi.co/api/v2`
    pub fn new(
        upstream: Arc<dyn Upstream>,
        responses: Arc<ResponseCache<Payload>>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            upstream,
            responses,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The response cache this fetcher populates.
    pub fn responses(&self) -> &Arc<ResponseCache<Payload>> {
        &self.responses
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // == Build Entity ==
    /// Fetches base record, species and lineage chain for `key` and merges
    /// them into one [`Entity`].
    ///
    /// Any failing sub-fetch aborts the build with that error.
    pub async fn build_entity(&self, key: &EntityKey) -> Result<Entity> {
        let (record, species) = tokio::try_join!(
            self.fetch::<PokemonRecord>(self.pokemon_url(key)),
            self.fetch::<SpeciesRecord>(self.species_url(key)),
        )?;

        let chain_id = chain_id(&species);
        let chain: EvolutionChainRecord = self.fetch(self.chain_url(chain_id)).await?;

        let generation =
            refs::format_generation_name(species.generation.as_ref().map(|g| g.name.as_str()));
        let lineage = lineage::flatten(&chain.chain);

        debug!(id = record.id, name = %record.name, "built entity");
        Ok(Entity::from_parts(record, generation, lineage))
    }

    // == Build Entity Batch ==
    /// Builds every id concurrently. The first failure fails the batch.
    pub async fn build_entity_batch(&self, ids: &[u32]) -> Result<Vec<Entity>> {
        try_join_all(ids.iter().map(|&id| async move {
            self.build_entity(&EntityKey::Id(id)).await
        }))
        .await
    }

    // == Listings ==
    /// One page of the entity listing.
    pub async fn list_page(&self, limit: usize, offset: usize) -> Result<ListEnvelope> {
        self.fetch(format!(
            "{}/pokemon?limit={limit}&offset={offset}",
            self.base_url
        ))
        .await
    }

    /// Ids referenced by a listing. Entries without a parsable id are skipped.
    pub fn ids_from_listing(listing: &ListEnvelope) -> Vec<u32> {
        listing
            .results
            .iter()
            .filter_map(|item| match refs::reference_id(&item.url, "pokemon") {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(name = %item.name, error = %err, "skipping listing entry");
                    None
                }
            })
            .collect()
    }

    /// Lists `limit` entities from `offset` and builds them all.
    pub async fn build_listing(&self, limit: usize, offset: usize) -> Result<Vec<Entity>> {
        let listing = self.list_page(limit, offset).await?;
        let ids = Self::ids_from_listing(&listing);
        self.build_entity_batch(&ids).await
    }

    // == Filter Options ==
    /// Main types and all generations, each resolved through the cache.
    pub async fn filter_options(&self) -> Result<FilterOptions> {
        let (type_index, generation_index) = tokio::try_join!(
            self.fetch::<ListEnvelope>(format!("{}/type", self.base_url)),
            self.fetch::<ListEnvelope>(format!("{}/generation", self.base_url)),
        )?;

        let (mut types, mut generations) = tokio::try_join!(
            try_join_all(
                type_index
                    .results
                    .iter()
                    .map(|item| self.fetch::<TypeRecord>(item.url.clone()))
            ),
            try_join_all(
                generation_index
                    .results
                    .iter()
                    .map(|item| self.fetch::<GenerationRecord>(item.url.clone()))
            ),
        )?;

        types.retain(|t| t.id <= MAIN_TYPE_MAX_ID);
        types.sort_by_key(|t| t.id);
        generations.sort_by_key(|g| g.id);

        Ok(FilterOptions { types, generations })
    }

    // == Lineage Members ==
    /// Base records for each name in the entity's lineage.
    ///
    /// Names that fail to resolve are left out rather than failing the page.
    pub async fn lineage_members(&self, entity: &Entity) -> Vec<LineageMember> {
        let lookups = entity.lineage.iter().map(|name| async move {
            let key = EntityKey::Name(name.clone());
            match self.fetch::<PokemonRecord>(self.pokemon_url(&key)).await {
                Ok(record) => Some(LineageMember {
                    id: record.id,
                    sprite: record.thumbnail(),
                    name: record.name,
                }),
                Err(err) => {
                    debug!(name = %name, error = %err, "lineage member unavailable");
                    None
                }
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }

    // == URLs ==
    fn pokemon_url(&self, key: &EntityKey) -> String {
        format!("{}/pokemon/{key}", self.base_url)
    }

    fn species_url(&self, key: &EntityKey) -> String {
        format!("{}/pokemon-species/{}", self.base_url, key.species_segment())
    }

    fn chain_url(&self, id: u32) -> String {
        format!("{}/evolution-chain/{id}", self.base_url)
    }

    // == Cached Fetch ==
    async fn fetch<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let payload = self
            .responses
            .fetch_or_populate(&url, || async {
                self.upstream.get_json(&url).await.map(Arc::new)
            })
            .await?;
        Ok(T::deserialize(payload.as_ref())?)
    }
}

/// Chain id referenced by a species, falling back to the placeholder when
/// the reference is missing or unparsable.
fn chain_id(species: &SpeciesRecord) -> u32 {
    let url = species
        .evolution_chain
        .as_ref()
        .and_then(|chain| chain.url.as_deref());

    match url {
        Some(url) => refs::reference_id(url, "evolution-chain").unwrap_or_else(|err| {
            warn!(species = %species.name, error = %err, "using placeholder chain");
            PLACEHOLDER_CHAIN_ID
        }),
        None => PLACEHOLDER_CHAIN_ID,
    }
}
