//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::http::handlers::{
    get_job, list_job_ids, list_job_urls, list_jobs, submit_job, trigger_sweep,
};
use crate::http::monitoring;
use crate::state::AppState;

/// Create the main router.
///
/// ## Route Structure
///
/// ```text
/// /jobs
///   POST   /jobs           - Submit job result
///   GET    /jobs           - List job results (?status=, ?label=)
///   GET    /jobs/ids       - Sorted job ids
///   GET    /jobs/urls      - Resource URLs
///   GET    /jobs/{job_id}  - Get job result
///
/// /sweep   - Manual retention sweep (POST)
/// /health  - Health check
/// /livez   - Liveness probe (Kubernetes)
/// ```
///
/// `/jobs/ids` and `/jobs/urls` take precedence over `/jobs/{job_id}`.
pub fn create_router(state: Arc<AppState>) -> Router {
    let job_routes = Router::new()
        .route("/", post(submit_job).get(list_jobs))
        .route("/ids", get(list_job_ids))
        .route("/urls", get(list_job_urls))
        .route("/{job_id}", get(get_job))
        .with_state(state.clone());

    let sweep_route = Router::new()
        .route("/sweep", post(trigger_sweep))
        .with_state(state.clone());

    let monitoring_routes = Router::new()
        .route("/health", get(monitoring::health_check))
        .with_state(state.clone());

    // Liveness probe has no state dependency
    let liveness_route = Router::new().route("/livez", get(monitoring::liveness_probe));

    Router::new()
        .nest("/jobs", job_routes)
        .merge(sweep_route)
        .merge(monitoring_routes)
        .merge(liveness_route)
        .layer(middleware::from_fn_with_state(state, count_requests))
        .layer(TraceLayer::new_for_http())
}

async fn count_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    state.increment_requests();
    next.run(request).await
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
