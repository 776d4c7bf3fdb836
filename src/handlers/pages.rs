//! Test-taker pages and the question bank

use askama::Template;
use axum::{extract::State, response::Html, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::state::AppSettings;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    minutes: u32,
}

/// GET / - Landing page that runs the test in the browser
pub async fn index(State(settings): State<Arc<AppSettings>>) -> ApiResult<Html<String>> {
    let page = IndexTemplate {
        minutes: settings.test_minutes,
    };
    Ok(Html(page.render()?))
}

/// GET /questions - The question bank, as stored on disk
pub async fn questions(State(settings): State<Arc<AppSettings>>) -> ApiResult<Json<Value>> {
    let path = &settings.questions_path;

    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        ApiError::InternalError(format!(
            "Cannot read question bank {}: {}",
            path.display(),
            e
        ))
    })?;

    let questions: Value = serde_json::from_str(&raw).map_err(|e| {
        ApiError::InternalError(format!(
            "Question bank {} is not valid JSON: {}",
            path.display(),
            e
        ))
    })?;

    Ok(Json(questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use std::path::PathBuf;

    fn settings_with(path: PathBuf) -> State<Arc<AppSettings>> {
        State(Arc::new(AppSettings {
            submission_prefix: "submissions/".to_string(),
            questions_path: path,
            test_minutes: 20,
        }))
    }

    #[test]
    fn test_bundled_bank_is_well_formed() {
        let bank: Vec<Question> =
            serde_json::from_str(include_str!("../../questions.json")).unwrap();

        assert!(!bank.is_empty());
        for question in &bank {
            assert!(
                question.options.contains(&question.answer),
                "answer of {} is not one of its options",
                question.id
            );
        }
    }

    #[tokio::test]
    async fn test_questions_missing_file_is_internal_error() {
        let result = questions(settings_with(PathBuf::from("/nonexistent/questions.json"))).await;
        assert!(matches!(result, Err(ApiError::InternalError(_))));
    }

    #[tokio::test]
    async fn test_index_shows_duration() {
        let Html(page) = index(settings_with(PathBuf::new())).await.unwrap();
        assert!(page.contains("20"));
    }
}
