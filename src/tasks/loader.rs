//! Initial Load Task
//!
//! Builds the first `count` entities and the filter options at startup,
//! then flips the catalog to ready (or failed).

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::catalog::CatalogStore;
use crate::upstream::EntityFetcher;

/// Spawns the initial catalog load.
///
/// # Arguments
/// * `catalog` - Shared catalog store, switched to loading immediately
/// * `fetcher` - Entity fetcher
/// * `count` - Number of entities listed from offset 0
pub fn spawn_initial_load(
    catalog: Arc<RwLock<CatalogStore>>,
    fetcher: EntityFetcher,
    count: usize,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        catalog.write().await.begin_loading();
        info!(count, "loading initial catalog");

        let result = tokio::try_join!(fetcher.build_listing(count, 0), fetcher.filter_options());

        catalog.write().await.finish_initial_load(result);
    })
}
