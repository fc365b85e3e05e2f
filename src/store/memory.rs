//! In-memory record store.
//!
//! Serves records held in memory, optionally loaded from a JSON file that
//! contains an array of salary records. Useful for local development and
//! for tests.

use super::{RecordStore, StoreError};
use crate::filter::Clause;
use crate::models::{Field, SalaryRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Record store backed by a vector of records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<SalaryRecord>,
    source: Option<PathBuf>,
}

impl MemoryStore {
    /// Create a store over the given records.
    pub fn new(records: Vec<SalaryRecord>) -> Self {
        Self {
            records,
            source: None,
        }
    }

    /// Load records from a JSON file containing an array of records.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let records: Vec<SalaryRecord> =
            serde_json::from_str(&content).map_err(|e| StoreError::Load {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        debug!("Loaded {} records from {}", records.len(), path.display());

        let mut store = Self::new(records);
        store.source = Some(path.to_path_buf());
        Ok(store)
    }

    /// Number of records held.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch(
        &self,
        clauses: &[Clause],
        _projection: &[Field],
    ) -> Result<Vec<SalaryRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|record| clauses.iter().all(|clause| clause.matches(record)))
            .cloned()
            .collect())
    }

    fn describe(&self) -> String {
        match self.source {
            Some(ref path) => format!("{} ({} records)", path.display(), self.record_count()),
            None => format!("memory ({} records)", self.record_count()),
        }
    }
}
