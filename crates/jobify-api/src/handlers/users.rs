//! Account and profile handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use jobify_core::{CandidateProfileUpdate, NewUser, ProfileOutcome, SignupOutcome};
use jobify_models::{CandidateProfile, Role, User};
use jobify_store::UserPatch;

use crate::auth::{issue_token, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Create a user account.
pub async fn signup(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    match state.accounts.signup(new_user).await? {
        SignupOutcome::Created => Ok((StatusCode::CREATED, Json(json!({ "success": true })))),
        SignupOutcome::AlreadyRegistered => Ok((
            StatusCode::OK,
            Json(json!({ "success": false, "duplicate": true })),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

/// Mint a session token for a signed-up account. The role comes from the
/// stored account record, not the request.
pub async fn token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> ApiResult<Json<Value>> {
    let role = state
        .accounts
        .role_of(&request.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("unknown account"))?;

    let token = issue_token(
        &state.config.jwt_secret,
        &request.email,
        role,
        state.config.jwt_ttl_secs,
    )?;
    Ok(Json(json!({ "token": token })))
}

/// The caller's own account record.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<User>> {
    let profile = state.accounts.profile(&user.identity()).await?;
    Ok(Json(profile))
}

/// Patch the caller's own profile through the allow-list.
pub async fn patch_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(patch): Json<UserPatch>,
) -> ApiResult<Json<User>> {
    let updated = state.accounts.patch_profile(&user.identity(), patch).await?;
    Ok(Json(updated))
}

/// Delete the caller's own account.
pub async fn delete_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    state.accounts.delete_account(&user.identity()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Role lookup by email.
pub async fn role_of(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Value>> {
    let role: Option<Role> = state.accounts.role_of(&email).await?;
    Ok(Json(json!({ "role": role })))
}

/// Upsert the caller's extended candidate profile.
pub async fn upsert_candidate_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(update): Json<CandidateProfileUpdate>,
) -> ApiResult<Json<CandidateProfile>> {
    match state
        .accounts
        .upsert_candidate_profile(&user.identity(), update)
        .await?
    {
        ProfileOutcome::Updated(profile) => Ok(Json(profile)),
        ProfileOutcome::PolicyViolation => Err(ApiError::forbidden(
            "only candidate accounts have a candidate profile",
        )),
    }
}

/// Fetch a candidate's extended profile.
pub async fn candidate_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    _user: AuthUser,
) -> ApiResult<Json<CandidateProfile>> {
    state
        .accounts
        .candidate_profile(&email)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("candidate {}", email)))
}
