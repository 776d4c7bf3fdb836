//! Submission intake and download routes

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::handlers::submissions;
use crate::state::AppState;

/// `max_upload_bytes` bounds the report upload body
pub fn submission_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/submit", post(submissions::submit))
        .route(
            "/upload-report",
            post(submissions::upload_report).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/download/*filename", get(submissions::download))
}
