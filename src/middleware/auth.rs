//! Authentication middleware
//!
//! Extractor that admits only requests carrying a valid admin session cookie.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::auth::{AuthService, SESSION_COOKIE};

/// Page that unauthenticated admin requests are sent to
pub const LOGIN_PATH: &str = "/login";

/// Authenticated administrator extracted from the session cookie
///
/// Rejects with a redirect to the login page rather than an error body, since
/// the gated routes are browser pages.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(admin: AdminSession) -> impl IntoResponse {
///     format!("Hello, {}", admin.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            tracing::debug!(path = %parts.uri.path(), "No admin session, redirecting to login");
            return Err(Redirect::to(LOGIN_PATH).into_response());
        };

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = auth_service.verify_session(cookie.value()).map_err(|e| {
            tracing::debug!(error = %e, path = %parts.uri.path(), "Rejected admin session");
            Redirect::to(LOGIN_PATH).into_response()
        })?;

        Ok(AdminSession {
            username: claims.sub,
        })
    }
}
