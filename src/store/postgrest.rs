//! PostgREST (Supabase) record store.
//!
//! Translates predicate clauses into PostgREST horizontal filters
//! (`column=op.value`) and fetches matching rows over HTTP.

use super::{RecordStore, StoreError};
use crate::filter::Clause;
use crate::models::{Field, SalaryRecord};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Record store backed by a PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout_seconds: u64,
}

impl PostgrestStore {
    /// Create a store for `table` under the project at `base_url`.
    pub fn new(
        base_url: &str,
        api_key: &str,
        table: &str,
        timeout_seconds: u64,
    ) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| StoreError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            api_key: api_key.to_string(),
            timeout_seconds,
        })
    }
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn fetch(
        &self,
        clauses: &[Clause],
        projection: &[Field],
    ) -> Result<Vec<SalaryRecord>, StoreError> {
        let params = query_params(clauses, projection);
        debug!("GET {} {:?}", self.endpoint, params);

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StoreError::Network {
                message: if e.is_timeout() {
                    format!("request timed out after {}s", self.timeout_seconds)
                } else if e.is_connect() {
                    format!("cannot connect to {}", self.endpoint)
                } else {
                    format!("failed to send request: {}", e)
                },
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Record store returned {}: {}", status, body);
            return Err(StoreError::Status { status, body });
        }

        response
            .json::<Vec<SalaryRecord>>()
            .await
            .map_err(|e| StoreError::Decode {
                message: e.to_string(),
            })
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Build the PostgREST query string for a fetch.
pub fn query_params(clauses: &[Clause], projection: &[Field]) -> Vec<(String, String)> {
    let select = if projection.is_empty() {
        "*".to_string()
    } else {
        projection
            .iter()
            .map(Field::column)
            .collect::<Vec<_>>()
            .join(",")
    };

    let mut params = vec![("select".to_string(), select)];
    params.extend(
        clauses
            .iter()
            .map(|clause| (clause.field().column().to_string(), filter_value(clause))),
    );
    params
}

fn filter_value(clause: &Clause) -> String {
    match clause {
        Clause::Membership { values, .. } => {
            let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
            format!("in.({})", quoted.join(","))
        }
        Clause::SubstringMatch {
            text,
            case_insensitive,
            ..
        } => {
            let op = if *case_insensitive { "ilike" } else { "like" };
            format!("{}.*{}*", op, text)
        }
        Clause::RangeGte { bound, .. } => format!("gte.{}", bound),
        Clause::RangeLte { bound, .. } => format!("lte.{}", bound),
        Clause::Equals { value, .. } => format!("eq.{}", value),
    }
}

/// Double-quote a list value so commas and parentheses survive.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
