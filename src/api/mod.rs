//! HTTP API.
//!
//! JSON endpoints under `/api`. Handlers parse filters, query the record
//! store and hand the rows to the shared statistics and aggregation code.

pub mod error;

pub use error::ApiError;

use crate::analysis::{
    agency_counts, compare, compute_histogram, compute_statistics, distinct_agency_count,
    distinct_sorted, top_agencies_by_average, Comparison, Selection,
};
use crate::config::Config;
use crate::filter::{translate, FilterCriteria, ParsePolicy, RawFilters};
use crate::models::{
    AgencyAverage, AgencyCount, DashboardSummary, Field, Histogram, SalaryRecord,
    StatisticsSummary,
};
use crate::store::RecordStore;
use anyhow::Context;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{Method, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Largest histogram a request may ask for.
const MAX_HISTOGRAM_BINS: usize = 100;

/// Settings handlers need from the configuration.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub environment: String,
    pub histogram_bins: usize,
    pub top_agencies: usize,
    pub numeric_filters: ParsePolicy,
}

impl From<&Config> for ApiSettings {
    fn from(config: &Config) -> Self {
        Self {
            environment: config.server.environment.clone(),
            histogram_bins: config.analysis.histogram_bins,
            top_agencies: config.analysis.top_agencies,
            numeric_filters: config.analysis.numeric_filters,
        }
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn RecordStore>,
    settings: Arc<ApiSettings>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, settings: ApiSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/salaries", get(salaries).fallback(not_found))
        .route("/api/statistics", get(statistics).fallback(not_found))
        .route("/api/agencies", get(agencies).fallback(not_found))
        .route("/api/job-titles", get(job_titles).fallback(not_found))
        .route("/api/comparison", post(comparison).fallback(not_found))
        .route("/api/dashboard", get(dashboard).fallback(not_found))
        .route("/api/histogram", get(histogram).fallback(not_found))
        .route("/api/health", get(health).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
}

/// Serve the API until Ctrl-C.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("Server running on http://{}", listener.local_addr()?);
    info!("Health check: http://{}/api/health", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Unwrap a query string, rendering a rejection as a JSON validation error.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(inner)| inner)
        .map_err(|rejection| ApiError::validation("Invalid query string", rejection.body_text()))
}

/// `GET /api/salaries`
async fn salaries(
    State(state): State<AppState>,
    filters: Result<Query<RawFilters>, QueryRejection>,
) -> Result<Json<Vec<SalaryRecord>>, ApiError> {
    let filters = query_params(filters)?;
    let criteria = filters.parse(state.settings.numeric_filters)?;
    if criteria.is_empty() {
        debug!("Fetching all salary records");
    }

    let records = state
        .store
        .fetch(&translate(&criteria), &[])
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch salary data"))?;

    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
struct StatisticsQuery {
    agency: Option<String>,
    job_title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsResponse {
    #[serde(flatten)]
    stats: StatisticsSummary,
    agency_count: usize,
    last_updated: DateTime<Utc>,
}

/// `GET /api/statistics`
async fn statistics(
    State(state): State<AppState>,
    query: Result<Query<StatisticsQuery>, QueryRejection>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let query = query_params(query)?;
    let criteria =
        FilterCriteria::for_selection(query.agency.as_deref(), query.job_title.as_deref());

    let records = state
        .store
        .fetch(&translate(&criteria), &[Field::Salary, Field::Agency])
        .await
        .map_err(|e| ApiError::store(e, "Failed to calculate statistics"))?;

    let salaries: Vec<f64> = records.iter().map(|r| r.salary).collect();

    Ok(Json(StatisticsResponse {
        stats: compute_statistics(&salaries),
        agency_count: distinct_agency_count(&records),
        last_updated: Utc::now(),
    }))
}

/// `GET /api/agencies`
async fn agencies(State(state): State<AppState>) -> Result<Json<Vec<AgencyCount>>, ApiError> {
    let records = state
        .store
        .fetch(&[], &[Field::Agency])
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch agencies"))?;

    let counts = agency_counts(&records)
        .into_iter()
        .map(AgencyCount::from)
        .collect();

    Ok(Json(counts))
}

#[derive(Debug, Deserialize)]
struct JobTitlesQuery {
    agency: Option<String>,
}

/// `GET /api/job-titles`
async fn job_titles(
    State(state): State<AppState>,
    query: Result<Query<JobTitlesQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let query = query_params(query)?;
    let criteria = FilterCriteria::for_selection(query.agency.as_deref(), None);
    if criteria.agencies.is_none() {
        return Err(ApiError::validation(
            "Agency parameter is required",
            "Please provide an agency name",
        ));
    }

    let records = state
        .store
        .fetch(&translate(&criteria), &[Field::JobTitle])
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch job titles"))?;

    Ok(Json(distinct_sorted(&records, |r| r.job_title.as_str())))
}

#[derive(Debug, Deserialize)]
struct ComparisonRequest {
    #[serde(default)]
    selection1: Option<Selection>,
    #[serde(default)]
    selection2: Option<Selection>,
}

/// `POST /api/comparison`
async fn comparison(
    State(state): State<AppState>,
    payload: Result<Json<ComparisonRequest>, JsonRejection>,
) -> Result<Json<Comparison>, ApiError> {
    let Json(request) = payload
        .map_err(|rejection| ApiError::validation("Invalid request body", rejection.body_text()))?;

    let (Some(first), Some(second)) = (request.selection1, request.selection2) else {
        return Err(ApiError::validation(
            "Both selections are required",
            "Please provide selection1 and selection2 objects",
        ));
    };

    for (name, selection) in [("selection1", &first), ("selection2", &second)] {
        if selection.criteria().agencies.is_none() {
            return Err(ApiError::validation(
                "Agency is required for each selection",
                format!("{} is missing an agency", name),
            ));
        }
    }

    let result = compare(
        state.store.as_ref(),
        &first,
        &second,
        state.settings.histogram_bins,
    )
    .await
    .map_err(|e| ApiError::store(e, "Failed to perform comparison"))?;

    debug!(
        "Compared '{}' and '{}': {} gap, {} disparity",
        result.selection1.label,
        result.selection2.label,
        result.insights.pay_gap_label,
        result.insights.disparity
    );

    Ok(Json(result))
}

/// `GET /api/dashboard`
async fn dashboard(
    State(state): State<AppState>,
    filters: Result<Query<RawFilters>, QueryRejection>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let filters = query_params(filters)?;
    let criteria = filters.parse(state.settings.numeric_filters)?;

    let records = state
        .store
        .fetch(&translate(&criteria), &[Field::Agency, Field::Salary])
        .await
        .map_err(|e| ApiError::store(e, "Failed to build dashboard"))?;

    let salaries: Vec<f64> = records.iter().map(|r| r.salary).collect();
    let top_agencies = top_agencies_by_average(&records, state.settings.top_agencies)
        .into_iter()
        .map(AgencyAverage::from)
        .collect();

    Ok(Json(DashboardSummary {
        total_employees: records.len(),
        total_agencies: distinct_agency_count(&records),
        avg_salary: compute_statistics(&salaries).avg,
        top_agencies,
    }))
}

#[derive(Debug, Deserialize)]
struct HistogramQuery {
    #[serde(flatten)]
    filters: RawFilters,
    bins: Option<String>,
}

/// `GET /api/histogram`
async fn histogram(
    State(state): State<AppState>,
    query: Result<Query<HistogramQuery>, QueryRejection>,
) -> Result<Json<Histogram>, ApiError> {
    let query = query_params(query)?;
    let policy = state.settings.numeric_filters;
    let criteria = query.filters.parse(policy)?;
    let bins = parse_bins(query.bins.as_deref(), state.settings.histogram_bins, policy)?;

    let records = state
        .store
        .fetch(&translate(&criteria), &[Field::Salary])
        .await
        .map_err(|e| ApiError::store(e, "Failed to build histogram"))?;

    let salaries: Vec<f64> = records.iter().map(|r| r.salary).collect();
    let histogram = compute_histogram(&salaries, bins);
    debug!("Histogram of {} salaries in {} bins", histogram.total(), bins);

    Ok(Json(histogram))
}

fn parse_bins(raw: Option<&str>, default: usize, policy: ParsePolicy) -> Result<usize, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(default);
    };

    let bins = match (raw.parse::<usize>(), policy) {
        (Ok(bins), _) => bins,
        (Err(_), ParsePolicy::Lenient) => return Ok(default),
        (Err(_), ParsePolicy::Strict) => {
            return Err(ApiError::validation(
                "Invalid filter value",
                format!("bins must be a number, got '{}'", raw),
            ))
        }
    };

    if bins == 0 || bins > MAX_HISTOGRAM_BINS {
        return Err(ApiError::validation(
            "Invalid filter value",
            format!("bins must be between 1 and {}", MAX_HISTOGRAM_BINS),
        ));
    }

    Ok(bins)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    environment: String,
}

/// `GET /api/health`
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        environment: state.settings.environment.clone(),
    })
}

async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound {
        method,
        path: uri.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Clause;
    use crate::store::{MemoryStore, StoreError};
    use async_trait::async_trait;
    use axum::body::{self, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt; // for `oneshot`

    const FIXTURE: &str = include_str!("../../fixtures/salaries.json");

    fn settings() -> ApiSettings {
        ApiSettings::from(&Config::default())
    }

    fn fixture_store() -> MemoryStore {
        MemoryStore::new(serde_json::from_str(FIXTURE).unwrap())
    }

    fn app() -> Router {
        router(AppState::new(Arc::new(fixture_store()), settings()))
    }

    /// Counts fetches and optionally fails them.
    struct ProbeStore {
        inner: MemoryStore,
        fetches: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl RecordStore for ProbeStore {
        async fn fetch(
            &self,
            clauses: &[Clause],
            projection: &[Field],
        ) -> Result<Vec<SalaryRecord>, StoreError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Status {
                    status: 503,
                    body: "upstream unavailable".to_string(),
                });
            }
            self.inner.fetch(clauses, projection).await
        }

        fn describe(&self) -> String {
            "probe".to_string()
        }
    }

    fn probe(fail: bool) -> Arc<ProbeStore> {
        Arc::new(ProbeStore {
            inner: fixture_store(),
            fetches: AtomicUsize::new(0),
            fail,
        })
    }

    fn app_with(store: Arc<ProbeStore>) -> Router {
        router(AppState::new(store, settings()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let body = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(app: Router, uri: &str, payload: String) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload))
            .unwrap();
        send(app, req).await
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["environment"], "development");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_salaries_with_filters() {
        let (status, body) = get_json(
            app(),
            "/api/salaries?agency=Police%20Department,Fire%20Department&min_salary=70000",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r["salary"].as_f64().unwrap() >= 70000.0));
    }

    #[tokio::test]
    async fn test_salaries_without_filters_returns_all() {
        let (status, body) = get_json(app(), "/api/salaries").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 14);
    }

    #[tokio::test]
    async fn test_salaries_invalid_number_is_rejected() {
        let store = probe(false);
        let app = router(AppState::new(store.clone(), settings()));

        let (status, body) = get_json(app, "/api/salaries?min_salary=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid filter value");
        assert_eq!(body["details"], "min_salary must be a number, got 'lots'");
        assert_eq!(store.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_salaries_invalid_number_ignored_when_lenient() {
        let mut settings = settings();
        settings.numeric_filters = ParsePolicy::Lenient;
        let app = router(AppState::new(Arc::new(fixture_store()), settings));

        let (status, body) = get_json(app, "/api/salaries?min_salary=lots&year=2023").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_statistics_for_agency() {
        let (status, body) = get_json(app(), "/api/statistics?agency=Police%20Department").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 5);
        assert_eq!(body["min"], 41000.0);
        assert_eq!(body["max"], 91000.0);
        assert_eq!(body["avg"], 68550.0);
        assert_eq!(body["median"], 70250.0);
        assert_eq!(body["q1"], 68000.0);
        assert_eq!(body["q3"], 72500.0);
        assert_eq!(body["agencyCount"], 1);
        assert!(body["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn test_statistics_no_match_is_all_zero() {
        let (status, body) = get_json(app(), "/api/statistics?agency=Nowhere").await;
        assert_eq!(status, StatusCode::OK);
        for key in ["min", "max", "avg", "median", "q1", "q3"] {
            assert_eq!(body[key], 0.0, "{} should be zero", key);
        }
        assert_eq!(body["count"], 0);
        assert_eq!(body["agencyCount"], 0);
    }

    #[tokio::test]
    async fn test_agencies_sorted_by_count() {
        let (status, body) = get_json(app(), "/api/agencies").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"name": "Police Department", "count": 5},
                {"name": "Fire Department", "count": 3},
                {"name": "Parks and Recreation", "count": 2},
                {"name": "Public Library", "count": 2},
                {"name": "Water Utility", "count": 2}
            ])
        );
    }

    #[tokio::test]
    async fn test_job_titles_require_agency() {
        let store = probe(false);
        let app = router(AppState::new(store.clone(), settings()));

        let (status, body) = get_json(app, "/api/job-titles?agency=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Agency parameter is required");
        assert_eq!(body["details"], "Please provide an agency name");
        assert_eq!(store.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_job_titles_sorted_unique() {
        let (status, body) = get_json(app(), "/api/job-titles?agency=Police%20Department").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!(["Police Officer", "Police Sergeant", "Records Clerk"])
        );
    }

    #[tokio::test]
    async fn test_comparison_missing_selection_is_rejected_before_fetch() {
        let store = probe(false);
        let app = router(AppState::new(store.clone(), settings()));

        let payload = json!({"selection1": {"agency": "Police Department"}}).to_string();
        let (status, body) = post_json(app, "/api/comparison", payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Both selections are required");
        assert_eq!(store.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_comparison_requires_agency_per_selection() {
        let payload = json!({
            "selection1": {"agency": "Police Department"},
            "selection2": {"job_title": "Firefighter"}
        })
        .to_string();
        let (status, body) = post_json(app(), "/api/comparison", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "selection2 is missing an agency");
    }

    #[tokio::test]
    async fn test_comparison_malformed_body() {
        let (status, body) = post_json(app(), "/api/comparison", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_comparison_success() {
        let payload = json!({
            "selection1": {"agency": "Police Department", "job_title": "Officer"},
            "selection2": {"agency": "Fire Department", "job_title": "Firefighter"}
        })
        .to_string();
        let (status, body) = post_json(app(), "/api/comparison", payload).await;
        assert_eq!(status, StatusCode::OK);

        let first = &body["selection1"];
        assert_eq!(first["label"], "Police Department - Officer");
        assert_eq!(first["count"], 3);
        assert_eq!(first["avg"], 70250.0);
        assert_eq!(first["median"], 70250.0);
        assert_eq!(first["salaries"].as_array().unwrap().len(), 3);
        assert_eq!(first["histogram"]["frequencies"].as_array().unwrap().len(), 10);

        let second = &body["selection2"];
        assert_eq!(second["count"], 2);
        assert_eq!(second["avg"], 65250.0);

        let insights = &body["insights"];
        assert_eq!(insights["pay_gap"], 5000.0);
        assert_eq!(insights["pay_gap_label"], "$5,000 (7.7%)");
        assert_eq!(insights["higher_average"], "Police Department - Officer");
        assert_eq!(insights["disparity"], "low");
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let (status, body) = get_json(app(), "/api/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_employees"], 14);
        assert_eq!(body["total_agencies"], 5);

        let avg = body["avg_salary"].as_f64().unwrap();
        assert!((avg - 909750.0 / 14.0).abs() < 1e-6);

        let top = body["top_agencies"].as_array().unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(top[0]["name"], "Water Utility");
        assert_eq!(top[0]["avg"], 82500.0);
        assert_eq!(top[4]["name"], "Parks and Recreation");
    }

    #[tokio::test]
    async fn test_dashboard_ranking_is_truncated() {
        let mut settings = settings();
        settings.top_agencies = 2;
        let app = router(AppState::new(Arc::new(fixture_store()), settings));

        let (_, body) = get_json(app, "/api/dashboard?max_salary=200000").await;
        let top = body["top_agencies"].as_array().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[1]["name"], "Fire Department");
    }

    #[tokio::test]
    async fn test_histogram_endpoint() {
        let (status, body) = get_json(app(), "/api/histogram?bins=4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bin_labels"][0], "$36,000");
        let total: u64 = body["frequencies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f.as_u64().unwrap())
            .sum();
        assert_eq!(total, 14);
        assert_eq!(body["frequencies"].as_array().unwrap().len(), 4);

        let (status, body) = get_json(app(), "/api/histogram?bins=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "bins must be between 1 and 100");
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let store = probe(true);
        let app = router(AppState::new(store.clone(), settings()));

        let (status, body) = get_json(app, "/api/agencies").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "record store error 503: upstream unavailable");
        assert_eq!(body["details"], "Failed to fetch agencies");
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, body) = get_json(app(), "/api/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
        assert_eq!(body["details"], "Route GET /api/unknown not found");
    }

    #[tokio::test]
    async fn test_wrong_method_on_known_route_is_404() {
        let (status, body) = get_json(app(), "/api/comparison").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
        assert_eq!(body["details"], "Route GET /api/comparison not found");

        let req = Request::builder()
            .method("POST")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["details"], "Route POST /api/health not found");
    }

    #[tokio::test]
    async fn test_malformed_query_string_is_json_400() {
        let store = probe(false);
        let app = router(AppState::new(store.clone(), settings()));

        let (status, body) = get_json(
            app,
            "/api/salaries?agency=Police%20Department&agency=Fire%20Department",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid query string");
        assert!(body["details"].as_str().unwrap().contains("agency"));
        assert_eq!(store.fetches.load(Ordering::SeqCst), 0);

        for uri in [
            "/api/statistics?job_title=a&job_title=b",
            "/api/job-titles?agency=a&agency=b",
            "/api/dashboard?year=1&year=2",
            "/api/histogram?bins=1&bins=2",
        ] {
            let (status, body) = get_json(app_with(probe(false)), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["error"], "Invalid query string", "{}", uri);
        }
    }

    #[test]
    fn test_parse_bins() {
        assert_eq!(parse_bins(None, 10, ParsePolicy::Strict).unwrap(), 10);
        assert_eq!(parse_bins(Some("25"), 10, ParsePolicy::Strict).unwrap(), 25);
        assert_eq!(parse_bins(Some("x"), 10, ParsePolicy::Lenient).unwrap(), 10);
        assert!(parse_bins(Some("x"), 10, ParsePolicy::Strict).is_err());
        assert!(parse_bins(Some("101"), 10, ParsePolicy::Lenient).is_err());
    }
}
