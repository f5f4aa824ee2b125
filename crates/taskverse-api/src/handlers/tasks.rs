//! Accepted-task API handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;
use validator::Validate;

use taskverse_models::wire::document_to_json;
use taskverse_models::AcceptedTask;
use taskverse_mongo::{DeleteReport, InsertReport};

use crate::error::{ApiError, ApiResult};
use crate::handlers::jobs::{parse_object_id, OwnerParams};
use crate::state::AppState;

/// Tasks the given user accepted, newest first.
pub async fn my_accepted_tasks(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
) -> ApiResult<Json<Vec<Value>>> {
    let email = params.email.unwrap_or_default();
    let documents = state
        .store
        .accepted_tasks()
        .for_user(&email)
        .await
        .map_err(ApiError::store("Error fetching accepted tasks"))?;

    Ok(Json(documents.into_iter().map(document_to_json).collect()))
}

/// Record that a user accepted a job.
pub async fn accept_task(
    State(state): State<AppState>,
    Json(payload): Json<AcceptedTask>,
) -> ApiResult<Json<InsertReport>> {
    payload.validate()?;

    let report = state
        .store
        .accepted_tasks()
        .insert(payload.into_document())
        .await
        .map_err(ApiError::store("Error accepting task"))?;

    Ok(Json(report))
}

/// Delete an accepted task by id.
pub async fn delete_accepted_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteReport>> {
    let id = parse_object_id(&id, "task")?;
    let report = state
        .store
        .accepted_tasks()
        .delete(id)
        .await
        .map_err(ApiError::store("Error deleting accepted task"))?;

    Ok(Json(report))
}
