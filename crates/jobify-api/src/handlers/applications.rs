//! Application workflow handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use jobify_core::{AppliedJobView, ApplyOutcome, TransitionOutcome};
use jobify_models::{Application, ApplicationId, ApplicationStatus, InterviewDetails, JobId};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Apply to a job. A repeat apply is a 200 with `duplicate: true`, never
/// a second record.
pub async fn apply(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    user: AuthUser,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let job_id = JobId::from_string(job_id);
    match state.workflow.apply(&user.identity(), &job_id).await? {
        ApplyOutcome::Applied { application } => Ok((
            StatusCode::CREATED,
            Json(json!({ "success": true, "application": application })),
        )),
        ApplyOutcome::Duplicate => Ok((
            StatusCode::OK,
            Json(json!({ "success": false, "duplicate": true })),
        )),
        ApplyOutcome::PolicyViolation => {
            Err(ApiError::forbidden("only candidate accounts can apply"))
        }
    }
}

/// The caller's applications, each joined with its job detail.
pub async fn applied_jobs(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<AppliedJobView>>> {
    let views = state.directory.applied_jobs(&user.email).await?;
    Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    /// Optional cross-check; must match the stored candidate_email
    pub applicant_email: Option<String>,
}

/// Change an application's status (company accounts).
pub async fn update_status(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
    user: AuthUser,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<Json<Application>> {
    let id = ApplicationId::from_string(application_id);
    match state
        .workflow
        .update_status(
            &user.identity(),
            &id,
            update.status,
            update.applicant_email.as_deref(),
        )
        .await?
    {
        TransitionOutcome::Updated { application } => Ok(Json(application)),
        TransitionOutcome::PolicyViolation => Err(ApiError::forbidden(
            "only company accounts can change application status",
        )),
    }
}

/// Schedule an interview for an application (company accounts).
pub async fn schedule_interview(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
    user: AuthUser,
    Json(details): Json<InterviewDetails>,
) -> ApiResult<Json<Application>> {
    let id = ApplicationId::from_string(application_id);
    match state
        .workflow
        .schedule_interview(&user.identity(), &id, details)
        .await?
    {
        TransitionOutcome::Updated { application } => Ok(Json(application)),
        TransitionOutcome::PolicyViolation => Err(ApiError::forbidden(
            "only company accounts can schedule interviews",
        )),
    }
}
