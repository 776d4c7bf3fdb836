//! Admin login/logout handlers

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::{AuthError, SESSION_COOKIE};
use crate::error::ApiError;
use crate::middleware::LOGIN_PATH;
use crate::models::LoginForm;
use crate::state::AppState;

const DASHBOARD_PATH: &str = "/admin";
const INVALID_CREDENTIALS: &str = "Invalid credentials.";

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    error: Option<&'a str>,
}

fn render_login(error: Option<&str>) -> Result<Html<String>, ApiError> {
    Ok(Html(LoginTemplate { error }.render()?))
}

/// GET /login - Login form
pub async fn login_page() -> Result<Html<String>, ApiError> {
    render_login(None)
}

/// POST /login - Verify credentials and start an admin session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let auth = &state.auth_service;

    match auth.login(&form.username, &form.password).await {
        Ok(token) => {
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(auth.secure_cookies());

            Ok((jar.add(cookie), Redirect::to(DASHBOARD_PATH)).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username, "Failed admin login");
            Ok(render_login(Some(INVALID_CREDENTIALS))?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /logout - Drop the session cookie
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to(LOGIN_PATH))
}
