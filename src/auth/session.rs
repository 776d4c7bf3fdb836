//! Admin session tokens
//!
//! The session cookie carries an HS256 JWT marking its holder as a logged-in
//! administrator.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "pretest_session";

const ADMIN_ROLE: &str = "admin";

/// Session token errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Session expired")]
    Expired,

    #[error("Not an admin session")]
    NotAdmin,
}

/// Claims stored in the session cookie
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Admin username
    pub sub: String,
    /// Always "admin"
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Issue a signed session token for `username`
pub fn issue_session_token(
    username: &str,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, SessionError> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: username.to_string(),
        role: ADMIN_ROLE.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| SessionError::EncodingFailed(e.to_string()))
}

/// Verify a session token and return its claims
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::DecodingFailed(e.to_string()),
    })?;

    if token_data.claims.role != ADMIN_ROLE {
        return Err(SessionError::NotAdmin);
    }

    Ok(token_data.claims)
}
