//! Test-taker pages

use axum::{routing::get, Router};

use crate::handlers::{health, pages};
use crate::state::AppState;

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/questions", get(pages::questions))
        .route("/health", get(health::health_check))
}
