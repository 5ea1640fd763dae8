//! Ledger persistence
//!
//! The visit list is small, so it is read and written whole.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::error::{DexError, Result};
use crate::models::RecentVisit;

/// Where the ledger keeps its list between runs.
pub trait VisitStore: Send + Sync {
    /// Stored visits, most recent first. Never fails: unreadable storage
    /// yields an empty list.
    fn load(&self) -> Vec<RecentVisit>;

    /// Replaces the stored list.
    fn save(&self, visits: &[RecentVisit]) -> Result<()>;
}

// ============================================================================
// JSON file
// ============================================================================

/// JSON array on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VisitStore for JsonFileStore {
    fn load(&self) -> Vec<RecentVisit> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read visit ledger");
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(visits) => visits,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt visit ledger, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, visits: &[RecentVisit]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DexError::Storage(format!(
                    "failed to create ledger dir {}: {e}",
                    parent.display()
                ))
            })?;
        }

        // Write to tmp file first, then rename over the ledger
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(visits)
            .map_err(|e| DexError::Storage(format!("failed to serialize ledger: {e}")))?;
        std::fs::write(&tmp_path, json).map_err(|e| {
            DexError::Storage(format!(
                "failed to write ledger file {}: {e}",
                tmp_path.display()
            ))
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            DexError::Storage(format!(
                "failed to rename ledger file {} to {}: {e}",
                tmp_path.display(),
                self.path.display()
            ))
        })?;

        Ok(())
    }
}

// ============================================================================
// In memory
// ============================================================================

/// Process-lifetime store, used in tests and when no path is wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    visits: Mutex<Vec<RecentVisit>>,
}

impl VisitStore for MemoryStore {
    fn load(&self) -> Vec<RecentVisit> {
        self.visits
            .lock()
            .map(|visits| visits.clone())
            .unwrap_or_default()
    }

    fn save(&self, visits: &[RecentVisit]) -> Result<()> {
        let mut stored = self
            .visits
            .lock()
            .map_err(|_| DexError::Storage("visit store lock poisoned".to_string()))?;
        *stored = visits.to_vec();
        Ok(())
    }
}
