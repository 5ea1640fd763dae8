//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::catalog::PAGE_SIZES;

/// Request body for PUT /filters
///
/// Every field is optional; only the fields present are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterUpdate {
    /// Free-text search over names and lineage names
    #[serde(default)]
    pub search: Option<String>,
    /// Type tag, or "all"
    #[serde(rename = "type", default)]
    pub type_filter: Option<String>,
    /// Generation label such as "Gen III", or "all"
    #[serde(default)]
    pub generation: Option<String>,
    /// One of the selectable page sizes
    #[serde(default)]
    pub items_per_page: Option<usize>,
}

impl FilterUpdate {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(size) = self.items_per_page {
            if !PAGE_SIZES.contains(&size) {
                return Some(format!(
                    "items_per_page must be one of {:?}, got {}",
                    PAGE_SIZES, size
                ));
            }
        }
        for (field, value) in [("type", &self.type_filter), ("generation", &self.generation)] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Some(format!("{field} cannot be empty; use \"all\" to clear it"));
            }
        }
        None
    }
}

/// Query string for GET /pokemon
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Narrow-screen page button layout
    #[serde(default)]
    pub compact: bool,
}
