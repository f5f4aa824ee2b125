//! Job API handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use taskverse_models::wire::document_to_json;
use taskverse_models::{Job, JobPatch};
use taskverse_mongo::{
    DeleteReport, InsertReport, JobFilter, ObjectId, Page, SortKey, UpdateReport,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// How many jobs the landing page shows.
const LATEST_JOBS_COUNT: i64 = 6;

/// Query parameters for the job listing.
///
/// Everything arrives as text and parses leniently: a page of `"abc"`
/// behaves like an absent page, the same way a half-filled filter form
/// does in the browser.
#[derive(Debug, Default, Deserialize)]
pub struct JobListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
}

impl JobListParams {
    fn page(&self) -> Page {
        Page::new(
            lenient(self.page.as_deref()).unwrap_or(0),
            lenient(self.limit.as_deref()).unwrap_or(0),
        )
    }

    fn filter(&self) -> JobFilter {
        JobFilter::new()
            .search(self.search.clone().unwrap_or_default())
            .category(self.category.clone().unwrap_or_default())
            .price_range(
                lenient(self.min_price.as_deref()),
                lenient(self.max_price.as_deref()),
            )
    }

    fn sort(&self) -> SortKey {
        self.sort.as_deref().map(SortKey::parse).unwrap_or_default()
    }
}

/// Parse an optional query value, treating junk as absent.
fn lenient<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Paged job listing response.
#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Value>,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

/// Owner email query, shared by the per-user listings.
#[derive(Debug, Default, Deserialize)]
pub struct OwnerParams {
    pub email: Option<String>,
}

/// Date ordering for the archive view. Only the two date spellings are
/// honored here; anything else keeps natural order.
fn date_sort(sort: Option<&str>) -> SortKey {
    match sort {
        Some("newest") => SortKey::Newest,
        Some("oldest") => SortKey::Oldest,
        _ => SortKey::Unordered,
    }
}

pub(crate) fn parse_object_id(id: &str, what: &str) -> Result<ObjectId, ApiError> {
    taskverse_mongo::repos::parse_object_id(id)
        .map_err(|_| ApiError::bad_request(format!("Invalid {what} id")))
}

/// Paged listing over the jobs collection.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListParams>,
) -> ApiResult<Json<JobListResponse>> {
    let (documents, total_count) = state
        .store
        .jobs()
        .search(&params.filter(), params.sort(), params.page())
        .await
        .map_err(ApiError::store("Error fetching jobs"))?;

    Ok(Json(JobListResponse {
        jobs: documents.into_iter().map(document_to_json).collect(),
        total_count,
    }))
}

/// The newest handful of jobs for the landing page.
pub async fn latest_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let documents = state
        .store
        .jobs()
        .latest(LATEST_JOBS_COUNT)
        .await
        .map_err(ApiError::store("Error fetching latest jobs"))?;

    Ok(Json(documents.into_iter().map(document_to_json).collect()))
}

/// The full jobs collection in date order.
pub async fn jobs_by_date(
    State(state): State<AppState>,
    Query(params): Query<JobListParams>,
) -> ApiResult<Json<Vec<Value>>> {
    let documents = state
        .store
        .jobs()
        .by_date(date_sort(params.sort.as_deref()))
        .await
        .map_err(ApiError::store("Error fetching jobs"))?;

    Ok(Json(documents.into_iter().map(document_to_json).collect()))
}

/// Single job detail. Unknown ids yield a JSON `null`.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_object_id(&id, "job")?;
    let document = state
        .store
        .jobs()
        .get(id)
        .await
        .map_err(ApiError::store("Error fetching job"))?;

    Ok(Json(document.map(document_to_json).unwrap_or(Value::Null)))
}

/// Jobs posted by the given email, newest first.
pub async fn my_added_jobs(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
) -> ApiResult<Json<Vec<Value>>> {
    let email = params.email.unwrap_or_default();
    let documents = state
        .store
        .jobs()
        .posted_by(&email)
        .await
        .map_err(ApiError::store("Error fetching jobs"))?;

    Ok(Json(documents.into_iter().map(document_to_json).collect()))
}

/// Validate and insert a job posting.
pub async fn add_job(
    State(state): State<AppState>,
    Json(payload): Json<Job>,
) -> ApiResult<Json<InsertReport>> {
    payload.validate()?;

    let report = state
        .store
        .jobs()
        .insert(payload.into_document())
        .await
        .map_err(ApiError::store("Error adding job"))?;

    Ok(Json(report))
}

/// Partial update of a job posting.
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<JobPatch>,
) -> ApiResult<Json<UpdateReport>> {
    let id = parse_object_id(&id, "job")?;
    payload.validate()?;

    let update = payload.into_set_document();
    if update.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let report = state
        .store
        .jobs()
        .update(id, update)
        .await
        .map_err(ApiError::store("Error updating job"))?;

    Ok(Json(report))
}

/// Delete a job posting.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteReport>> {
    let id = parse_object_id(&id, "job")?;
    let report = state
        .store
        .jobs()
        .delete(id)
        .await
        .map_err(ApiError::store("Error deleting job"))?;

    Ok(Json(report))
}
