//! Job result HTTP handlers.
//!
//! - POST /jobs           - Submit job result
//! - GET  /jobs           - List job results
//! - GET  /jobs/ids       - List job ids
//! - GET  /jobs/urls      - List resource URLs
//! - GET  /jobs/{job_id}  - Get job result
//! - POST /sweep          - Run retention sweep

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use jobstash_store::{
    Record, RecordFilter, StoredId, SweepReport, get_one, list_external_refs, list_ids,
    list_records,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Response for an accepted submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub stored_id: StoredId,
    pub record: Record,
}

/// Response for listing job results.
#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub count: usize,
    pub jobs: Vec<Record>,
}

/// Response for listing job ids.
#[derive(Debug, Serialize)]
pub struct JobIdsResponse {
    pub count: usize,
    pub ids: Vec<String>,
}

/// Response for listing resource URLs.
#[derive(Debug, Serialize)]
pub struct JobUrlsResponse {
    pub count: usize,
    pub urls: Vec<Option<String>>,
}

/// Response for a single job result.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: Record,
}

/// Run filesystem work off the async executor.
async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Task(e.to_string()))
}

/// Submit a job result.
///
/// POST /jobs
pub async fn submit_job(
    State(state): State<Arc<AppState>>,
    Json(record): Json<Record>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    info!("Submitting result for job '{}'", record.job_id);

    let store = state.store.clone();
    let pending = record.clone();
    let stored_id = run_blocking(move || store.put(&pending))
        .await?
        .inspect_err(|e| error!("Failed to save result for job '{}': {}", record.job_id, e))?;

    if state.retention.sweep_on_submit {
        let sweeper = state.sweeper.clone();
        let max_age_days = state.retention.max_age_days;
        if let Err(e) = run_blocking(move || sweeper.sweep(max_age_days)).await {
            warn!("Retention sweep after submission failed: {}", e);
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Data saved successfully",
            stored_id,
            record,
        }),
    ))
}

/// List job results, optionally filtered by `status` and `label`.
///
/// GET /jobs
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<RecordFilter>,
) -> Result<Json<JobListResponse>, ApiError> {
    let store = state.store.clone();
    let jobs = run_blocking(move || list_records(&store, &filter)).await?;

    Ok(Json(JobListResponse {
        count: jobs.len(),
        jobs,
    }))
}

/// List job ids in lexicographic order.
///
/// GET /jobs/ids
pub async fn list_job_ids(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JobIdsResponse>, ApiError> {
    let store = state.store.clone();
    let mut ids = run_blocking(move || list_ids(&store)).await?;
    ids.sort();

    Ok(Json(JobIdsResponse {
        count: ids.len(),
        ids,
    }))
}

/// List the resource URL of every job result.
///
/// GET /jobs/urls
pub async fn list_job_urls(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JobUrlsResponse>, ApiError> {
    let store = state.store.clone();
    let urls = run_blocking(move || list_external_refs(&store)).await?;

    Ok(Json(JobUrlsResponse {
        count: urls.len(),
        urls,
    }))
}

/// Get the first job result with the given id.
///
/// GET /jobs/{job_id}
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<JobResponse>, ApiError> {
    let store = state.store.clone();
    let lookup = job_id.clone();
    match run_blocking(move || get_one(&store, &lookup)).await? {
        Some(job) => Ok(Json(JobResponse { job })),
        None => Err(ApiError::NotFound(job_id)),
    }
}

/// Run a retention sweep with the configured threshold.
///
/// POST /sweep
pub async fn trigger_sweep(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SweepReport>, ApiError> {
    info!("Manual retention sweep requested");

    let sweeper = state.sweeper.clone();
    let max_age_days = state.retention.max_age_days;
    let report = run_blocking(move || sweeper.sweep(max_age_days)).await?;

    Ok(Json(report))
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
