//! Synthetic upstream for unit tests.
//!
//! Serves a catalog of `count` entities named `mon-{id}`, each its own
//! single-stage lineage, and can be switched to fail listing requests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{DexError, Result};
use crate::upstream::Upstream;

pub(crate) const BASE: &str = "https://dex.test/api/v2";

#[derive(Debug)]
pub(crate) struct SyntheticUpstream {
    count: u32,
    pub(crate) fail_listings: AtomicBool,
    pub(crate) requests: AtomicUsize,
}

impl SyntheticUpstream {
    pub(crate) fn new(count: u32) -> Self {
        Self {
            count,
            fail_listings: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
        }
    }

    pub(crate) fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn listing(&self, query: &str) -> Result<Value> {
        if self.fail_listings.load(Ordering::SeqCst) {
            return Err(DexError::status("listing", 500, "Internal Server Error"));
        }
        let mut limit = 20u32;
        let mut offset = 0u32;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("limit", v)) => limit = v.parse().unwrap_or(limit),
                Some(("offset", v)) => offset = v.parse().unwrap_or(offset),
                _ => {}
            }
        }
        let results: Vec<Value> = (offset + 1..=offset.saturating_add(limit).min(self.count))
            .map(|id| json!({ "name": format!("mon-{id}"), "url": format!("{BASE}/pokemon/{id}/") }))
            .collect();
        Ok(json!({ "count": self.count, "results": results }))
    }

    fn id_in(&self, segment: &str) -> Option<u32> {
        let id = segment
            .parse::<u32>()
            .ok()
            .or_else(|| segment.strip_prefix("mon-")?.parse().ok())?;
        (1..=self.count).contains(&id).then_some(id)
    }
}

#[async_trait]
impl Upstream for SyntheticUpstream {
    async fn get_json(&self, url: &str) -> Result<Value> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let not_found = || DexError::status(url, 404, "Not Found");

        let rest = url.strip_prefix(BASE).ok_or_else(not_found)?;
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

        match parts.as_slice() {
            ["pokemon"] => self.listing(query),
            ["pokemon", key] => {
                let id = self.id_in(key).ok_or_else(not_found)?;
                Ok(json!({
                    "id": id,
                    "name": format!("mon-{id}"),
                    "sprites": { "front_default": format!("{id}.png") },
                    "types": [{ "slot": 1, "type": { "name": if id % 2 == 0 { "water" } else { "fire" }, "url": "u" } }],
                    "stats": [{ "base_stat": 40, "stat": { "name": "hp", "url": "u" } }],
                    "height": 3,
                    "weight": 30
                }))
            }
            ["pokemon-species", key] => {
                let id = self.id_in(key).ok_or_else(not_found)?;
                let generation = if id <= 151 { "generation-i" } else { "generation-ii" };
                Ok(json!({
                    "id": id,
                    "name": format!("mon-{id}"),
                    "generation": { "name": generation, "url": "u" },
                    "evolution_chain": { "url": format!("{BASE}/evolution-chain/{id}/") }
                }))
            }
            ["evolution-chain", key] => {
                let id = self.id_in(key).ok_or_else(not_found)?;
                Ok(json!({
                    "id": id,
                    "chain": { "species": { "name": format!("mon-{id}"), "url": "u" }, "evolves_to": [] }
                }))
            }
            ["type"] => Ok(json!({ "count": 1, "results": [{ "name": "fire", "url": format!("{BASE}/type/10") }] })),
            ["type", "10"] => Ok(json!({ "id": 10, "name": "fire" })),
            ["generation"] => Ok(json!({ "count": 1, "results": [{ "name": "generation-i", "url": format!("{BASE}/generation/1") }] })),
            ["generation", "1"] => Ok(json!({ "id": 1, "name": "generation-i" })),
            _ => Err(not_found()),
        }
    }
}
