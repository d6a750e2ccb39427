//! API integration tests.
//!
//! Exercise the router end to end against the in-memory store: no network,
//! no external services.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use jobify_api::{create_router, ApiConfig, AppState};

fn test_router() -> axum::Router {
    let config = ApiConfig {
        jwt_secret: "test-secret".to_string(),
        ..ApiConfig::default()
    };
    create_router(AppState::new(config), None)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Sign up an account and mint a session token for it.
async fn signup_and_login(app: &axum::Router, email: &str, role: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users",
            None,
            json!({ "email": email, "role": role, "name": "Test Account" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/token", None, json!({ "email": email })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

/// Register a company, buy a plan, and complete the payment so the account
/// has job slots.
async fn provision_company(app: &axum::Router, token: &str) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/companies",
            Some(token),
            json!({ "company_name": "Acme" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/plans/purchase",
            Some(token),
            json!({
                "tier": "basic",
                "success_url": "https://app.test/ok",
                "fail_url": "https://app.test/fail",
                "cancel_url": "https://app.test/cancel"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tran_id = body_json(response).await["tran_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/payment/success/{}", tran_id),
            None,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn post_job(app: &axum::Router, token: &str, title: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/jobs",
            Some(token),
            json!({
                "job_title": title,
                "category": "engineering",
                "job_type": "full-time",
                "location": "Berlin, Germany",
                "expiration_date": "2099-01-01T00:00:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_router()
        .oneshot(get("/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers() {
    let response = test_router()
        .oneshot(get("/health", None))
        .await
        .unwrap();

    let headers = response.headers();
    assert!(headers.contains_key("X-Content-Type-Options"));
    assert!(headers.contains_key("X-Frame-Options"));
    assert!(headers.contains_key("X-Request-ID"));
}

#[tokio::test]
async fn test_short_search_term_is_rejected() {
    let response = test_router()
        .oneshot(get("/api/jobs?title=ab", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unauthenticated_apply_is_rejected() {
    let response = test_router()
        .oneshot(post_json("/api/jobs/j1/apply", None, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_post_search_and_apply_flow() {
    let app = test_router();

    let company_token = signup_and_login(&app, "hr@acme.test", "company").await;
    provision_company(&app, &company_token).await;
    let job_id = post_job(&app, &company_token, "Senior Rust Engineer").await;

    // The posting shows up in a listing with the company join applied
    let response = app
        .clone()
        .oneshot(get("/api/jobs?title=rust", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["jobs"][0]["id"], job_id.as_str());

    // Candidate applies
    let candidate_token = signup_and_login(&app, "dev@x.com", "candidate").await;
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/jobs/{}/apply", job_id),
            Some(&candidate_token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Second apply: soft duplicate, not an error
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/jobs/{}/apply", job_id),
            Some(&candidate_token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["duplicate"], true);

    // Company accounts cannot apply
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/jobs/{}/apply", job_id),
            Some(&company_token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The candidate's dashboard shows the joined application
    let response = app
        .clone()
        .oneshot(get("/api/me/applications", Some(&candidate_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let applications = body_json(response).await;
    assert_eq!(applications.as_array().unwrap().len(), 1);
    assert_eq!(applications[0]["job"]["id"], job_id.as_str());
}

#[tokio::test]
async fn test_job_limit_exhaustion_over_http() {
    let app = test_router();
    let token = signup_and_login(&app, "hr@acme.test", "company").await;
    provision_company(&app, &token).await;

    // Basic plan carries five postings
    for i in 0..5 {
        post_job(&app, &token, &format!("Opening {}", i)).await;
    }

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/jobs",
            Some(&token),
            json!({
                "job_title": "One too many",
                "category": "engineering",
                "job_type": "full-time",
                "location": "Remote",
                "expiration_date": "2099-01-01T00:00:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_tier_is_rejected() {
    let app = test_router();
    let token = signup_and_login(&app, "hr@acme.test", "company").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/plans/purchase",
            Some(&token),
            json!({
                "tier": "gold",
                "success_url": "https://app.test/ok",
                "fail_url": "https://app.test/fail",
                "cancel_url": "https://app.test/cancel"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_patch_and_delete() {
    let app = test_router();
    let token = signup_and_login(&app, "dev@x.com", "candidate").await;

    let request = Request::builder()
        .method("PATCH")
        .uri("/api/me")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(json!({ "location": "Lisbon" }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["location"], "Lisbon");

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get("/api/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
