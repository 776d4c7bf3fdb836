//! Submission intake and raw object access

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::models::{stamp_submission, submission_object_name, SubmitResponse};
use crate::state::AppState;
use crate::storage::validate_object_name;

const JSON_CONTENT_TYPE: &str = "application/json";
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// POST /submit - Timestamp a finished test and store it
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<SubmitResponse>> {
    let (submission, timestamp) =
        stamp_submission(body, Utc::now()).map_err(ApiError::BadRequest)?;

    let object_name = submission_object_name(&state.settings.submission_prefix, &timestamp);
    let payload = serde_json::to_vec(&submission)
        .map_err(|e| ApiError::InternalError(format!("Cannot serialize submission: {}", e)))?;

    state
        .store
        .put(&object_name, Bytes::from(payload), JSON_CONTENT_TYPE)
        .await?;

    tracing::info!(
        object = %object_name,
        name = ?submission.get("name").and_then(|v| v.as_str()),
        "Stored submission"
    );

    Ok(Json(SubmitResponse {
        status: "success".to_string(),
        submitted: submission,
    }))
}

/// POST /upload-report - Store the PDF report generated in the browser
///
/// Multipart fields: `file` (the PDF) and `filename` (object name below the
/// submission prefix). `student_name` and `student_email` are accepted and
/// ignored.
pub async fn upload_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut file: Option<(Option<String>, Bytes)> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().map(str::to_string);
                file = Some((original_name, field.bytes().await?));
            }
            Some("filename") => filename = Some(field.text().await?),
            _ => {}
        }
    }

    let (original_name, data) =
        file.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;

    let filename = filename
        .filter(|name| !name.trim().is_empty())
        .or(original_name)
        .ok_or_else(|| ApiError::BadRequest("Missing 'filename' field".to_string()))?;
    validate_object_name(&filename)?;

    let object_name = format!("{}{}", state.settings.submission_prefix, filename);
    let size = data.len();
    state.store.put(&object_name, data, PDF_CONTENT_TYPE).await?;

    tracing::info!(object = %object_name, size, "Stored report");

    Ok((StatusCode::OK, "Uploaded"))
}

/// GET /download/*filename - Return a stored object as an attachment
///
/// Served as JSON unless the object is a `.pdf` report.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    validate_object_name(&filename)?;

    let data = state.store.get(&filename).await?;
    let basename = filename
        .rsplit('/')
        .next()
        .unwrap_or(&filename)
        .replace('"', "_");

    let content_type = if basename.ends_with(".pdf") {
        PDF_CONTENT_TYPE
    } else {
        JSON_CONTENT_TYPE
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", basename),
            ),
        ],
        data,
    ))
}
