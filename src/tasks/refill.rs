//! Background Refill Task
//!
//! Fetches the listing window for a deep page and merges the built entities
//! into the catalog once they arrive. Page derivation never waits on it.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::catalog::{CatalogStore, RefillWindow};
use crate::upstream::EntityFetcher;

/// Schedules a refill for the committed page if one is due.
///
/// Returns `None` when the page is within the lookahead, the catalog is not
/// ready, or the same window is already being fetched.
///
/// # Arguments
/// * `catalog` - Shared catalog store
/// * `fetcher` - Entity fetcher used by the spawned task
pub async fn maybe_schedule_refill(
    catalog: &Arc<RwLock<CatalogStore>>,
    fetcher: &EntityFetcher,
) -> Option<JoinHandle<()>> {
    let window = {
        let mut store = catalog.write().await;
        let window = store.refill_window()?;
        if !store.try_begin_refill(window) {
            debug!(offset = window.offset, limit = window.limit, "refill already in flight");
            return None;
        }
        window
    };

    Some(spawn_refill_task(catalog.clone(), fetcher.clone(), window))
}

/// Spawns the fetch for `window`, which must already be marked in flight.
///
/// The task is detached from the request that caused it: navigating away
/// does not cancel it, and its result is merged whenever it completes.
///
/// # Returns
/// A JoinHandle for the spawned task.
pub fn spawn_refill_task(
    catalog: Arc<RwLock<CatalogStore>>,
    fetcher: EntityFetcher,
    window: RefillWindow,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(offset = window.offset, limit = window.limit, "fetching more entities");

        let result = fetcher.build_listing(window.limit, window.offset).await;

        catalog.write().await.complete_refill(window, result);
    })
}
