//! Bookmark handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use jobify_core::BookmarkOutcome;
use jobify_models::{Bookmark, JobId};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Bookmark a job. A repeat bookmark is a 200 with `duplicate: true`.
pub async fn bookmark_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    user: AuthUser,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let job_id = JobId::from_string(job_id);
    match state.workflow.bookmark(&user.identity(), &job_id).await? {
        BookmarkOutcome::Bookmarked { bookmark } => Ok((
            StatusCode::CREATED,
            Json(json!({ "success": true, "bookmark": bookmark })),
        )),
        BookmarkOutcome::AlreadyBookmarked => Ok((
            StatusCode::OK,
            Json(json!({ "success": false, "duplicate": true })),
        )),
        BookmarkOutcome::PolicyViolation => {
            Err(ApiError::forbidden("only candidate accounts can bookmark jobs"))
        }
    }
}

/// The caller's bookmarks.
pub async fn list_bookmarks(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Bookmark>>> {
    let bookmarks = state.directory.bookmarks(&user.email).await?;
    Ok(Json(bookmarks))
}
