//! Results dashboard, available to logged-in admins only

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::error::{ApiError, ApiResult};
use crate::middleware::AdminSession;
use crate::models::{SubmissionRecord, SubmissionSummary};
use crate::services::{load_submission, summarize_submissions, LoadError};
use crate::state::AppState;
use crate::storage::validate_object_name;

/// Dashboard row with ready-made links
struct DashboardRow {
    name: String,
    email: String,
    result_href: String,
    download_href: String,
    pdf_href: Option<String>,
}

impl From<SubmissionSummary> for DashboardRow {
    fn from(summary: SubmissionSummary) -> Self {
        Self {
            name: summary.name.unwrap_or_default(),
            email: summary.email.unwrap_or_default(),
            result_href: format!("/result/{}", encode_object_path(&summary.filename)),
            download_href: format!("/download/{}", encode_object_path(&summary.filename)),
            pdf_href: summary
                .pdf_link
                .map(|pdf| format!("/download/{}", encode_object_path(&pdf))),
        }
    }
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    username: String,
    rows: Vec<DashboardRow>,
}

#[derive(Template)]
#[template(path = "student_result.html")]
struct ResultTemplate {
    result: SubmissionRecord,
    raw: String,
}

/// Percent-encode each segment of an object name, keeping the slashes
fn encode_object_path(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// GET /admin - List every stored submission
pub async fn dashboard(
    State(state): State<AppState>,
    admin: AdminSession,
) -> ApiResult<Html<String>> {
    let summaries =
        summarize_submissions(state.store.as_ref(), &state.settings.submission_prefix).await?;

    let page = AdminTemplate {
        username: admin.username,
        rows: summaries.into_iter().map(DashboardRow::from).collect(),
    };

    Ok(Html(page.render()?))
}

/// GET /result/*filename - Render one submission
pub async fn view_result(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(filename): Path<String>,
) -> ApiResult<Html<String>> {
    validate_object_name(&filename)?;

    let value = load_submission(state.store.as_ref(), &filename)
        .await
        .map_err(|e| match e {
            LoadError::Storage(storage) => ApiError::from(storage),
            LoadError::Malformed(reason) => ApiError::InternalError(reason),
        })?;

    let result = SubmissionRecord::from_value(&value);
    let raw = serde_json::to_string_pretty(&value)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Html(ResultTemplate { result, raw }.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_object_path_keeps_slashes() {
        assert_eq!(
            encode_object_path("submissions/GED Result #1.pdf"),
            "submissions/GED%20Result%20%231.pdf"
        );
    }

    #[test]
    fn test_dashboard_row_links() {
        let row = DashboardRow::from(SubmissionSummary {
            name: Some("Ana".to_string()),
            email: None,
            filename: "submissions/submission_a.json".to_string(),
            pdf_link: Some("submissions/submission_a.pdf".to_string()),
        });

        assert_eq!(row.name, "Ana");
        assert_eq!(row.email, "");
        assert_eq!(row.result_href, "/result/submissions/submission_a.json");
        assert_eq!(row.download_href, "/download/submissions/submission_a.json");
        assert_eq!(
            row.pdf_href.as_deref(),
            Some("/download/submissions/submission_a.pdf")
        );
    }
}
