//! Route definitions for the pretest server

mod admin;
mod auth;
mod pages;
mod submissions;

use axum::Router;
use std::path::PathBuf;
use tower_http::services::ServeDir;

use crate::middleware;
use crate::state::AppState;

pub use admin::admin_routes;
pub use auth::auth_routes;
pub use pages::page_routes;
pub use submissions::submission_routes;

/// Router-level settings that are not needed by handlers
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Directory served under /static
    pub static_dir: PathBuf,

    /// Body limit for report uploads
    pub max_upload_bytes: usize,

    /// Add Strict-Transport-Security to every response
    pub hsts: bool,
}

/// Build the full application router
pub fn app(state: AppState, options: RouterOptions) -> Router {
    let mut router = Router::new()
        .merge(page_routes())
        .merge(submission_routes(options.max_upload_bytes))
        .merge(auth_routes())
        .merge(admin_routes())
        .nest_service("/static", ServeDir::new(&options.static_dir))
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing));

    if options.hsts {
        router = router.layer(axum::middleware::from_fn(middleware::hsts_header));
    }

    router
}
