//! Background Tasks Module
//!
//! Work that runs detached from any request.
//!
//! # Tasks
//! - Initial load: builds the first entities and the filter options at startup
//! - Refill: fetches the listing window for deep pages and merges it

mod loader;
mod refill;

pub use loader::spawn_initial_load;
pub use refill::{maybe_schedule_refill, spawn_refill_task};
