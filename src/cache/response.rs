//! Response Cache Module
//!
//! URL-keyed cache of decoded upstream payloads with LRU eviction. Every
//! upstream call goes through [`ResponseCache::fetch_or_populate`].
//!
//! Concurrent misses on the same key are coalesced: the first caller loads,
//! later callers wait on a per-key gate and re-check the cache once it opens.
//! Failed loads are never cached, so a waiter behind a failed leader simply
//! loads again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheStats, ResponseStore};
use crate::error::{DexError, Result};

/// Decoded JSON document as cached for upstream calls.
pub type Payload = Arc<serde_json::Value>;

// == Response Cache ==
/// Thread-safe, capacity-bounded LRU cache with per-key single-flight loads.
#[derive(Debug)]
pub struct ResponseCache<V = Payload> {
    /// Payload storage guarded for check -> evict -> insert
    store: Mutex<ResponseStore<V>>,
    /// Per-key gates for in-flight loads
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<V: Clone + Send> ResponseCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` payloads.
    pub fn new(capacity: usize) -> Self {
        Self {
            store: Mutex::new(ResponseStore::new(capacity)),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    // == Get ==
    /// Returns the cached payload for `key`, marking it as just used.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.lock().await.get(key)
    }

    // == Fetch Or Populate ==
    /// Returns the cached payload for `key`, or runs `loader` and caches its
    /// result as the newest entry.
    ///
    /// Loader errors are surfaced as [`DexError::FetchFailed`] for `key` and
    /// leave the cache untouched.
    pub async fn fetch_or_populate<F, Fut>(&self, key: &str, loader: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.store.lock().await.get(key) {
            return Ok(value);
        }

        let gate = self.gate(key).await;
        let guard = Arc::clone(&gate).lock_owned().await;

        // A leader may have populated the key while we waited
        if let Some(value) = self.store.lock().await.refresh(key) {
            drop(guard);
            self.release(key, gate).await;
            return Ok(value);
        }

        debug!(key, "loading response");
        let result = loader().await;

        let outcome = {
            let mut store = self.store.lock().await;
            match result {
                Ok(value) => {
                    store.insert(key.to_string(), value.clone());
                    Ok(value)
                }
                Err(err) => {
                    store.record_load_failure();
                    Err(as_fetch_failure(key, err))
                }
            }
        };

        drop(guard);
        self.release(key, gate).await;
        outcome
    }

    // == Clear ==
    /// Drops every cached payload.
    pub async fn clear(&self) {
        self.store.lock().await.clear();
    }

    // == Length ==
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.store.lock().await.contains(key)
    }

    pub async fn capacity(&self) -> usize {
        self.store.lock().await.capacity()
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    // == Gate Bookkeeping ==
    async fn gate(&self, key: &str) -> Arc<Mutex<()>> {
        let mut inflight = self.inflight.lock().await;
        Arc::clone(
            inflight
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Drops the gate once no other caller holds it.
    async fn release(&self, key: &str, gate: Arc<Mutex<()>>) {
        let mut inflight = self.inflight.lock().await;
        // map + ours
        let last = Arc::strong_count(&gate) <= 2;
        drop(gate);
        if last {
            inflight.remove(key);
        }
    }
}

fn as_fetch_failure(key: &str, err: DexError) -> DexError {
    match err {
        err @ DexError::FetchFailed { .. } => err,
        other => DexError::transport(key, other.to_string()),
    }
}
