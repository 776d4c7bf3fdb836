//! Authentication service
//!
//! Credential checks against the admin table and session issuance.

use std::sync::Arc;
use thiserror::Error;

use crate::db::AdminRepository;

use super::password::{hash_password, verify_password};
use super::session::{issue_session_token, verify_session_token, SessionClaims, SessionError};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::DatabaseError(e.to_string())
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    admins: Arc<dyn AdminRepository>,
    session_secret: String,
    session_ttl_seconds: i64,
    secure_cookies: bool,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        admins: Arc<dyn AdminRepository>,
        session_secret: String,
        session_ttl_seconds: i64,
        secure_cookies: bool,
    ) -> Self {
        Self {
            admins,
            session_secret,
            session_ttl_seconds,
            secure_cookies,
        }
    }

    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    pub fn admins(&self) -> &Arc<dyn AdminRepository> {
        &self.admins
    }

    /// Verify a username/password pair and issue a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let admin = self
            .admins
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password.to_string(), admin.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(username = %admin.username, "Admin logged in");

        Ok(issue_session_token(
            &admin.username,
            &self.session_secret,
            self.session_ttl_seconds,
        )?)
    }

    /// Validate a session cookie value
    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, SessionError> {
        verify_session_token(token, &self.session_secret)
    }

    /// Create the configured admin account if it does not exist yet
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        if self.admins.find_by_username(username).await?.is_some() {
            tracing::debug!(username = %username, "Bootstrap admin already present");
            return Ok(false);
        }

        let password_hash = hash_password(password.to_string()).await?;
        let created = self
            .admins
            .insert_if_absent(username, &password_hash)
            .await?
            .is_some();

        if created {
            tracing::info!(username = %username, "Bootstrap admin created");
        }

        Ok(created)
    }
}
