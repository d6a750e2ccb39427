//! Plan purchase and entitlement handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use jobify_core::{CheckoutUrls, CompletionOutcome, PurchaseOutcome};
use jobify_models::PlanTier;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Tier name; unknown names are rejected, never silently defaulted
    pub tier: String,
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
}

/// Start a plan purchase and return the checkout redirect.
pub async fn purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<PurchaseRequest>,
) -> ApiResult<Json<Value>> {
    let tier: PlanTier = request
        .tier
        .parse()
        .map_err(|e: jobify_models::PlanTierParseError| ApiError::bad_request(e.to_string()))?;

    let outcome = state
        .entitlements
        .purchase(
            &user.identity(),
            tier,
            CheckoutUrls {
                success_url: request.success_url,
                fail_url: request.fail_url,
                cancel_url: request.cancel_url,
            },
        )
        .await?;

    match outcome {
        PurchaseOutcome::Initiated(session) => Ok(Json(json!({
            "redirect_url": session.redirect_url,
            "tran_id": session.tran_id,
        }))),
        PurchaseOutcome::PolicyViolation => {
            Err(ApiError::forbidden("only company accounts can purchase plans"))
        }
    }
}

/// Gateway completion callback. Unauthenticated: the gateway knows only
/// the transaction id.
pub async fn payment_success(
    State(state): State<AppState>,
    Path(tran_id): Path<String>,
) -> ApiResult<Json<Value>> {
    match state.entitlements.complete(&tran_id).await? {
        CompletionOutcome::Completed { tier, company_updated } => Ok(Json(json!({
            "success": true,
            "tier": tier,
            "company_updated": company_updated,
        }))),
        CompletionOutcome::UnknownTransaction => {
            Err(ApiError::not_found(format!("transaction {}", tran_id)))
        }
    }
}

/// Client-side confirmation path; requires the purchasing account.
pub async fn confirm(
    State(state): State<AppState>,
    Path(tran_id): Path<String>,
    user: AuthUser,
) -> ApiResult<Json<Value>> {
    match state.entitlements.confirm(&user.identity(), &tran_id).await? {
        CompletionOutcome::Completed { tier, company_updated } => Ok(Json(json!({
            "success": true,
            "tier": tier,
            "company_updated": company_updated,
        }))),
        CompletionOutcome::UnknownTransaction => {
            Err(ApiError::not_found(format!("transaction {}", tran_id)))
        }
    }
}
