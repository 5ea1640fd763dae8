//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{ENTITY_CACHE_CAPACITY, RESPONSE_CACHE_CAPACITY};

/// Default upstream catalog root
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Number of entities fetched by the initial load
pub const DEFAULT_INITIAL_LOAD_COUNT: usize = 200;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL of the upstream catalog API (no trailing slash)
    pub upstream_base_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Per-request upstream timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Maximum number of cached upstream responses
    pub response_cache_capacity: usize,
    /// Maximum number of cached entities
    pub entity_cache_capacity: usize,
    /// How many entities the startup load builds
    pub initial_load_count: usize,
    /// File backing the recently-visited ledger
    pub recent_visits_path: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UPSTREAM_BASE_URL` - Catalog API root (default: https://pokeapi.co/api/v2)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `FETCH_TIMEOUT_SECS` - Upstream timeout (default: 10)
    /// - `RESPONSE_CACHE_CAPACITY` - Response cache entries (default: 500)
    /// - `ENTITY_CACHE_CAPACITY` - Entity cache entries (default: 1025)
    /// - `INITIAL_LOAD_COUNT` - Entities built at startup (default: 200)
    /// - `RECENT_VISITS_PATH` - Ledger file (default: recently_visited.json)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            fetch_timeout_secs: parse_var("FETCH_TIMEOUT_SECS")
                .unwrap_or(defaults.fetch_timeout_secs),
            response_cache_capacity: parse_var("RESPONSE_CACHE_CAPACITY")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.response_cache_capacity),
            entity_cache_capacity: parse_var("ENTITY_CACHE_CAPACITY")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.entity_cache_capacity),
            initial_load_count: parse_var("INITIAL_LOAD_COUNT")
                .unwrap_or(defaults.initial_load_count),
            recent_visits_path: env::var("RECENT_VISITS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.recent_visits_path),
        }
    }

    /// Upstream timeout as a `Duration`.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            server_port: 3000,
            fetch_timeout_secs: 10,
            response_cache_capacity: RESPONSE_CACHE_CAPACITY,
            entity_cache_capacity: ENTITY_CACHE_CAPACITY,
            initial_load_count: DEFAULT_INITIAL_LOAD_COUNT,
            recent_visits_path: PathBuf::from("recently_visited.json"),
        }
    }
}
