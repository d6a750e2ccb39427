//! Job directory and posting handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use jobify_core::{
    JobDetail, JobListingPage, JobListingParams, NewJob, PatchOutcome, PostOutcome,
};
use jobify_models::{Job, JobId};
use jobify_store::JobPatch;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Listing/search query parameters.
#[derive(Debug, Deserialize, Validate)]
pub struct JobSearchParams {
    #[validate(length(min = 3, message = "search term must have at least 3 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 3, message = "search term must have at least 3 characters"))]
    pub location: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 3, message = "search term must have at least 3 characters"))]
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub company: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// List or search jobs.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobSearchParams>,
) -> ApiResult<Json<JobListingPage>> {
    params
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let page = state
        .directory
        .list_jobs(JobListingParams {
            title: params.title,
            location: params.location,
            job_type: params.job_type,
            category: params.category,
            tag: params.tag,
            featured: params.featured,
            company_name: params.company,
            page: params.page,
            limit: params.limit,
            include_inactive: false,
        })
        .await?;

    Ok(Json(page))
}

/// Composite job detail view.
pub async fn job_detail(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobDetail>> {
    let detail = state
        .directory
        .job_detail(&JobId::from_string(job_id))
        .await?;
    Ok(Json(detail))
}

/// Create a posting (company accounts).
pub async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(new_job): Json<NewJob>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    match state.postings.post(&user.identity(), new_job).await? {
        PostOutcome::Created(job) => Ok((StatusCode::CREATED, Json(job))),
        PostOutcome::PolicyViolation => {
            Err(ApiError::forbidden("only company accounts can post jobs"))
        }
        PostOutcome::LimitExhausted => Err(ApiError::forbidden(
            "job posting limit exhausted for the current plan",
        )),
    }
}

/// Patch a posting through the allow-list.
pub async fn patch_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    user: AuthUser,
    Json(patch): Json<JobPatch>,
) -> ApiResult<Json<Job>> {
    let job_id = JobId::from_string(job_id);
    match state.postings.patch(&user.identity(), &job_id, patch).await? {
        PatchOutcome::Patched(job) => Ok(Json(job)),
        PatchOutcome::PolicyViolation => Err(ApiError::forbidden(
            "only the owning company account can edit a posting",
        )),
    }
}

/// Take a posting down early.
pub async fn close_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<Job>> {
    let job_id = JobId::from_string(job_id);
    match state.postings.close(&user.identity(), &job_id).await? {
        PatchOutcome::Patched(job) => Ok(Json(job)),
        PatchOutcome::PolicyViolation => Err(ApiError::forbidden(
            "only the owning company account can close a posting",
        )),
    }
}
