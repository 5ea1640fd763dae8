//! Upstream Module
//!
//! Everything that talks to the remote catalog: the transport seam, reference
//! parsing, lineage flattening and the entity fetcher built on the response
//! cache.

mod client;
mod fetcher;
pub mod lineage;
pub mod refs;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{HttpUpstream, Upstream};
pub use fetcher::{EntityFetcher, FilterOptions};
pub use refs::EntityKey;

// == Public Constants ==
/// Highest species identifier upstream knows; species lookups clamp to it
pub const SPECIES_ID_BOUND: u32 = 1025;

/// Chain identifier used when a species carries no usable chain reference
pub const PLACEHOLDER_CHAIN_ID: u32 = 1;

/// Type records above this id are special types, not offered as filters
pub const MAIN_TYPE_MAX_ID: u32 = 18;
