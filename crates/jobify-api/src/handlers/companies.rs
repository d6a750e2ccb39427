//! Company directory handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use jobify_core::{CompanyListingPage, CompanyRegistration, SignupOutcome};
use jobify_models::CompanyId;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompanyListParams {
    pub name: Option<String>,
    pub id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// List companies, each with its open-posting count.
pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<CompanyListParams>,
) -> ApiResult<Json<CompanyListingPage>> {
    let page = state
        .directory
        .list_companies(
            params.name,
            params.id.map(CompanyId::from_string),
            params.page,
            params.limit,
        )
        .await?;
    Ok(Json(page))
}

/// Register the company record for the calling company account.
pub async fn register_company(
    State(state): State<AppState>,
    user: AuthUser,
    Json(registration): Json<CompanyRegistration>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    match state
        .accounts
        .register_company(&user.identity(), registration)
        .await?
    {
        SignupOutcome::Created => Ok((StatusCode::CREATED, Json(json!({ "success": true })))),
        SignupOutcome::AlreadyRegistered => Ok((
            StatusCode::OK,
            Json(json!({ "success": false, "duplicate": true })),
        )),
    }
}
