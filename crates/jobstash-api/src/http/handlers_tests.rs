//! Tests for job result handlers.

use super::*;
use jobstash_config::Config;
use jobstash_store::SystemClock;
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const DAY: Duration = Duration::from_secs(86_400);

fn test_state(dir: &TempDir, sweep_on_submit: bool) -> Arc<AppState> {
    let mut config = Config::default();
    config.storage.path = dir.path().join("responses");
    config.retention.sweep_on_submit = sweep_on_submit;
    Arc::new(AppState::from_config(&config, Arc::new(SystemClock)).unwrap())
}

fn stale_file(state: &AppState, name: &str, age: Duration) -> PathBuf {
    let path = state.store.dir().join(name);
    fs::write(&path, r#"{"job_id": "stale"}"#).unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() - age)
        .unwrap();
    path
}

async fn submit(state: &Arc<AppState>, record: Record) -> SubmitResponse {
    let (status, Json(response)) = submit_job(State(state.clone()), Json(record))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    response
}

#[test]
fn test_job_list_response_serialization() {
    let response = JobListResponse {
        count: 0,
        jobs: vec![],
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["count"], 0);
    assert!(json["jobs"].as_array().unwrap().is_empty());
}

#[test]
fn test_job_urls_response_serializes_missing_as_null() {
    let response = JobUrlsResponse {
        count: 2,
        urls: vec![Some("https://example.org/a".to_string()), None],
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["urls"][0], "https://example.org/a");
    assert!(json["urls"][1].is_null());
}

#[tokio::test]
async fn test_submit_job_persists_record() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, false);

    let response = submit(&state, Record::new("job-1").with_status("done")).await;

    assert_eq!(response.message, "Data saved successfully");
    assert_eq!(response.record.job_id, "job-1");
    assert!(state.store.dir().join(response.stored_id.as_str()).is_file());
    assert_eq!(state.store.get_by_id("job-1").unwrap().status.as_deref(), Some("done"));
}

#[tokio::test]
async fn test_submit_job_sweeps_when_enabled() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, true);
    let stale = stale_file(&state, "stale.json", 3 * DAY);

    submit(&state, Record::new("fresh")).await;

    assert!(!stale.exists());
    assert!(state.store.get_by_id("fresh").is_some());
}

#[tokio::test]
async fn test_submit_job_skips_sweep_when_disabled() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, false);
    let stale = stale_file(&state, "stale.json", 3 * DAY);

    submit(&state, Record::new("fresh")).await;

    assert!(stale.exists());
}

#[tokio::test]
async fn test_submit_job_reports_store_failure() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, false);
    fs::remove_dir_all(state.store.dir()).unwrap();

    let result = submit_job(State(state.clone()), Json(Record::new("job-1"))).await;

    match result {
        Err(err @ ApiError::Store(_)) => {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
        other => panic!("expected store error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_jobs_with_filter() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, false);
    submit(&state, Record::new("a").with_status("passed").with_labels(["nightly"])).await;
    submit(&state, Record::new("b").with_status("failed").with_labels(["nightly"])).await;
    submit(&state, Record::new("c").with_status("passed")).await;

    let Json(all) = list_jobs(State(state.clone()), Query(RecordFilter::default()))
        .await
        .unwrap();
    assert_eq!(all.count, 3);

    let filter = RecordFilter {
        status: Some("passed".to_string()),
        label: Some("nightly".to_string()),
    };
    let Json(filtered) = list_jobs(State(state.clone()), Query(filter)).await.unwrap();
    assert_eq!(filtered.count, 1);
    assert_eq!(filtered.jobs[0].job_id, "a");
}

#[tokio::test]
async fn test_list_jobs_empty_directory() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, false);

    let Json(response) = list_jobs(State(state), Query(RecordFilter::default()))
        .await
        .unwrap();
    assert_eq!(response.count, 0);
    assert!(response.jobs.is_empty());
}

#[tokio::test]
async fn test_list_job_ids_sorted() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, false);
    for id in ["zeta", "alpha", "mid", "alpha"] {
        submit(&state, Record::new(id)).await;
    }

    let Json(response) = list_job_ids(State(state)).await.unwrap();
    assert_eq!(response.count, 4);
    assert_eq!(response.ids, vec!["alpha", "alpha", "mid", "zeta"]);
}

#[tokio::test]
async fn test_list_job_urls() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, false);
    submit(&state, Record::new("a").with_url("https://example.org/a")).await;
    submit(&state, Record::new("b")).await;

    let Json(response) = list_job_urls(State(state)).await.unwrap();
    assert_eq!(response.count, 2);
    assert!(response.urls.contains(&Some("https://example.org/a".to_string())));
    assert!(response.urls.contains(&None));
}

#[tokio::test]
async fn test_get_job_found_and_missing() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, false);
    submit(&state, Record::new("job-9").with_message("ok")).await;

    let Json(found) = get_job(State(state.clone()), Path("job-9".to_string()))
        .await
        .unwrap();
    assert_eq!(found.job.message.as_deref(), Some("ok"));

    let missing = get_job(State(state), Path("nope".to_string())).await;
    assert!(matches!(missing, Err(ApiError::NotFound(id)) if id == "nope"));
}

#[tokio::test]
async fn test_trigger_sweep_reports_removals() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, false);
    let stale = stale_file(&state, "old.json", 5 * DAY);
    stale_file(&state, "recent.json", DAY);

    let Json(report) = trigger_sweep(State(state)).await.unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.removed, 1);
    assert_eq!(report.retained, 1);
    assert_eq!(report.removed_files, vec![stale]);
    assert!(report.is_clean());
}
