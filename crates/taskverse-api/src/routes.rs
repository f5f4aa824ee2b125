//! API routes.

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::auth::require_auth;
use crate::handlers::health::{health, root};
use crate::handlers::jobs::{
    add_job, delete_job, get_job, jobs_by_date, latest_jobs, list_jobs, my_added_jobs, update_job,
};
use crate::handlers::stats::get_stats;
use crate::handlers::tasks::{accept_task, delete_accepted_task, my_accepted_tasks};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let policy = state.config.auth_policy;
    let require = middleware::from_fn_with_state(state.clone(), require_auth);

    // Owner-facing routes, always behind the token gate
    let protected_routes = Router::new()
        // Single job detail
        .route("/allJobs/:id", get(get_job))
        // Jobs the caller posted
        .route("/myAddedJobs", get(my_added_jobs))
        // Job mutation
        .route("/updateJob/:id", put(update_job))
        .route("/deleteJob/:id", delete(delete_job))
        // Accepted-task list and creation
        .route(
            "/my-accepted-tasks",
            get(my_accepted_tasks).post(accept_task),
        )
        // Per-user dashboard counters
        .route("/stats", get(get_stats))
        .route_layer(require.clone());

    // Browse endpoints, public unless the deployment opts in
    let mut listing_routes = Router::new()
        .route("/allJobs", get(list_jobs))
        .route("/latestJobs", get(latest_jobs))
        .route("/sort-by-date/jobs", get(jobs_by_date));
    if policy.protect_public_listings {
        listing_routes = listing_routes.route_layer(require.clone());
    }

    let mut job_create_routes = Router::new().route("/addJob", post(add_job));
    if policy.protect_job_create {
        job_create_routes = job_create_routes.route_layer(require.clone());
    }

    let mut task_delete_routes =
        Router::new().route("/my-accepted-tasks/:id", delete(delete_accepted_task));
    if policy.protect_task_delete {
        task_delete_routes = task_delete_routes.route_layer(require);
    }

    let health_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(protected_routes)
        .merge(listing_routes)
        .merge(job_create_routes)
        .merge(task_delete_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
