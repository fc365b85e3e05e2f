//! Record store access.
//!
//! The salary table lives behind the [`RecordStore`] trait so handlers never
//! construct a database client themselves. Two implementations exist: a
//! PostgREST (Supabase) client and an in-memory store loaded from JSON.

pub mod memory;
pub mod postgrest;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

use crate::config::StoreConfig;
use crate::filter::Clause;
use crate::models::{Field, SalaryRecord};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors returned by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("record store unreachable: {message}")]
    Network { message: String },

    /// The store answered with a non-success status.
    #[error("record store error {status}: {body}")]
    Status { status: u16, body: String },

    /// The store's response could not be decoded.
    #[error("invalid record store response: {message}")]
    Decode { message: String },

    /// A local data file could not be loaded.
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },
}

/// Query capability over the salary table.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the records matching all `clauses`.
    ///
    /// `projection` lists the columns the caller needs; an empty slice means
    /// all columns. Implementations may return more columns than requested.
    async fn fetch(
        &self,
        clauses: &[Clause],
        projection: &[Field],
    ) -> Result<Vec<SalaryRecord>, StoreError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Build the record store selected by the configuration.
///
/// A configured data file wins over a remote URL.
pub fn from_config(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    if let Some(ref path) = config.data_file {
        let store = MemoryStore::load(path)?;
        info!("Using in-memory record store: {}", store.describe());
        return Ok(Arc::new(store));
    }

    match (config.url.as_deref(), config.api_key.as_deref()) {
        (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => {
            let store = PostgrestStore::new(url, key, &config.table, config.timeout_seconds)?;
            info!("Using PostgREST record store: {}", store.describe());
            Ok(Arc::new(store))
        }
        _ => bail!(
            "No record store configured. Set SUPABASE_URL and SUPABASE_KEY, \
             or point --data at a JSON file."
        ),
    }
}
