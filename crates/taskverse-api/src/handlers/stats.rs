//! Dashboard statistics handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::handlers::jobs::OwnerParams;
use crate::state::AppState;

/// Per-user dashboard counters.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Jobs the user posted.
    pub posted_jobs: u64,
    /// Tasks the user accepted.
    pub accepted_tasks: u64,
    /// Jobs on the whole platform, from collection metadata.
    pub total_platform_jobs: u64,
    /// Reserved for the bidding flow; always zero for now.
    pub pending_bids: u64,
}

/// Aggregate counters for the signed-in user's dashboard.
pub async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
) -> ApiResult<Json<StatsResponse>> {
    let email = params.email.unwrap_or_default();
    let jobs = state.store.jobs();
    let tasks = state.store.accepted_tasks();

    let (posted_jobs, accepted_tasks, total_platform_jobs) = tokio::try_join!(
        jobs.count_posted_by(&email),
        tasks.count_for_user(&email),
        jobs.estimated_total(),
    )
    .map_err(ApiError::store("Error fetching stats"))?;

    Ok(Json(StatsResponse {
        posted_jobs,
        accepted_tasks,
        total_platform_jobs,
        pending_bids: 0,
    }))
}
