//! API routes.

use axum::middleware;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::applications::{apply, applied_jobs, schedule_interview, update_status};
use crate::handlers::bookmarks::{bookmark_job, list_bookmarks};
use crate::handlers::companies::{list_companies, register_company};
use crate::handlers::jobs::{close_job, create_job, job_detail, list_jobs, patch_job};
use crate::handlers::plans::{confirm, payment_success, purchase};
use crate::handlers::users::{
    candidate_profile, delete_me, me, patch_me, role_of, signup, token, upsert_candidate_profile,
};
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let job_routes = Router::new()
        // Directory
        .route("/jobs", get(list_jobs))
        .route("/jobs/:job_id", get(job_detail))
        // Posting management (company accounts)
        .route("/jobs", post(create_job))
        .route("/jobs/:job_id", patch(patch_job))
        .route("/jobs/:job_id", delete(close_job))
        // Candidate actions
        .route("/jobs/:job_id/apply", post(apply))
        .route("/jobs/:job_id/bookmark", post(bookmark_job));

    let application_routes = Router::new()
        .route("/applications/:application_id/status", patch(update_status))
        .route("/applications/:application_id/interview", post(schedule_interview));

    let company_routes = Router::new()
        .route("/companies", get(list_companies))
        .route("/companies", post(register_company));

    let plan_routes = Router::new()
        .route("/plans/purchase", post(purchase))
        // Gateway callback (unauthenticated; keyed by transaction id)
        .route("/payment/success/:tran_id", post(payment_success))
        // Client confirmation (authenticated)
        .route("/plans/confirm/:tran_id", post(confirm));

    let user_routes = Router::new()
        .route("/users", post(signup))
        .route("/users/:email/role", get(role_of))
        .route("/auth/token", post(token))
        .route("/me", get(me))
        .route("/me", patch(patch_me))
        .route("/me", delete(delete_me))
        .route("/me/applications", get(applied_jobs))
        .route("/me/bookmarks", get(list_bookmarks))
        .route("/me/candidate-profile", put(upsert_candidate_profile))
        .route("/candidates/:email", get(candidate_profile));

    let api_routes = Router::new()
        .merge(job_routes)
        .merge(application_routes)
        .merge(company_routes)
        .merge(plan_routes)
        .merge(user_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
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
