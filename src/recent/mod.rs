//! Recently-Visited Module
//!
//! Bounded history of entity detail visits, persisted between runs.

mod ledger;
mod storage;

pub use ledger::{push_visit, RecentlyVisited};
pub use storage::{JsonFileStore, MemoryStore, VisitStore};

/// Visits kept in the ledger
pub const RECENT_VISITS_CAPACITY: usize = 12;
