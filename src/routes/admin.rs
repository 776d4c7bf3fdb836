//! Admin dashboard routes, gated by the session extractor

use axum::{routing::get, Router};

use crate::handlers::admin;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/result/*filename", get(admin::view_result))
}
