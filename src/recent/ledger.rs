//! Recently-visited ledger
//!
//! Most-recent-first list of entity detail visits, deduplicated by id and
//! capped at [`RECENT_VISITS_CAPACITY`]. Every change is written through to
//! the backing [`VisitStore`].

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::RecentVisit;
use crate::recent::{VisitStore, RECENT_VISITS_CAPACITY};

pub struct RecentlyVisited {
    store: Box<dyn VisitStore>,
    capacity: usize,
    visits: Mutex<Vec<RecentVisit>>,
}

impl RecentlyVisited {
    // == Constructor ==
    /// Opens the ledger, reading whatever `store` already holds.
    pub fn open(store: Box<dyn VisitStore>) -> Self {
        Self::with_capacity(store, RECENT_VISITS_CAPACITY)
    }

    pub fn with_capacity(store: Box<dyn VisitStore>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut visits = store.load();
        visits.truncate(capacity);
        debug!(count = visits.len(), "loaded visit ledger");

        Self {
            store,
            capacity,
            visits: Mutex::new(visits),
        }
    }

    // == Load ==
    /// Current visits, most recent first.
    pub async fn load(&self) -> Vec<RecentVisit> {
        self.visits.lock().await.clone()
    }

    // == Record ==
    /// Puts `visit` at the front, dropping any earlier visit to the same id.
    ///
    /// The in-memory list is updated even if persisting it fails.
    pub async fn record(&self, visit: RecentVisit) -> Result<()> {
        let mut visits = self.visits.lock().await;
        push_visit(&mut visits, visit, self.capacity);
        self.persist(&visits)
    }

    // == Clear ==
    pub async fn clear(&self) -> Result<()> {
        let mut visits = self.visits.lock().await;
        visits.clear();
        self.persist(&visits)
    }

    fn persist(&self, visits: &[RecentVisit]) -> Result<()> {
        self.store.save(visits).inspect_err(|err| {
            warn!(error = %err, "failed to persist visit ledger");
        })
    }
}

/// Dedup-by-id, push to front, truncate to `capacity`.
pub fn push_visit(visits: &mut Vec<RecentVisit>, visit: RecentVisit, capacity: usize) {
    visits.retain(|existing| existing.id != visit.id);
    visits.insert(0, visit);
    visits.truncate(capacity);
}
