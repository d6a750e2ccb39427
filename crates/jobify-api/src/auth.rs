//! Session token authentication.
//!
//! Tokens are HS256 JWTs minted by the login endpoint; the claims carry the
//! (email, role) pair the core's role check consumes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use jobify_core::Identity;
use jobify_models::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account email
    pub sub: String,
    /// Account role (candidate/company)
    pub role: Role,
    /// Expiration
    pub exp: i64,
    /// Issued at
    pub iat: i64,
}

/// Mint a session token for an account.
pub fn issue_token(
    secret: &str,
    email: &str,
    role: Role,
    ttl_secs: i64,
) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: email.to_string(),
        role,
        exp: now + ttl_secs,
        iat: now,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("failed to sign token: {}", e)))
}

/// Verify a session token and return its claims.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| ApiError::unauthorized(format!("Token validation failed: {}", e)))
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// The identity pair handed to core workflows.
    pub fn identity(&self) -> Identity {
        Identity::new(self.email.clone(), self.role)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            role: claims.role,
        }
    }
}

/// Axum extractor for authenticated user.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))?;

        let claims = verify_token(&state.config.jwt_secret, token)?;

        Ok(AuthUser::from(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = issue_token("secret", "a@x.com", Role::Candidate, 60).unwrap();
        let claims = verify_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.role, Role::Candidate);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token("secret", "a@x.com", Role::Candidate, 60).unwrap();
        assert!(verify_token("other", &token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token("secret", "a@x.com", Role::Company, -120).unwrap();
        assert!(verify_token("secret", &token).is_err());
    }
}
