//! Reading stored submissions back for the dashboard

use std::collections::HashSet;

use serde_json::Value;

use crate::models::{field_text, pdf_name_for, SubmissionSummary};
use crate::storage::{ObjectStore, StorageError};

/// Summarize every submission JSON stored under `prefix`
///
/// Objects that are not JSON objects are logged and skipped. `name` and
/// `email` are taken as sent; non-string values are shown as JSON text.
/// `pdf_link` is set only when the matching report object exists.
pub async fn summarize_submissions(
    store: &dyn ObjectStore,
    prefix: &str,
) -> Result<Vec<SubmissionSummary>, StorageError> {
    let objects = store.list(prefix).await?;
    let names: HashSet<&str> = objects.iter().map(|o| o.name.as_str()).collect();

    let mut summaries = Vec::new();
    for object in objects.iter().filter(|o| o.name.ends_with(".json")) {
        let data = store.get(&object.name).await?;

        let document = match serde_json::from_slice::<Value>(&data) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                tracing::warn!(object = %object.name, "Skipping submission that is not a JSON object");
                continue;
            }
            Err(e) => {
                tracing::warn!(object = %object.name, error = %e, "Skipping unreadable submission");
                continue;
            }
        };

        let pdf_name = pdf_name_for(&object.name);
        summaries.push(SubmissionSummary {
            name: document.get("name").and_then(field_text),
            email: document.get("email").and_then(field_text),
            filename: object.name.clone(),
            pdf_link: names.contains(pdf_name.as_str()).then_some(pdf_name),
        });
    }

    tracing::debug!(prefix = %prefix, count = summaries.len(), "Summarized submissions");

    Ok(summaries)
}

/// Load one stored submission as raw JSON
pub async fn load_submission(store: &dyn ObjectStore, name: &str) -> Result<Value, LoadError> {
    let data = store.get(name).await?;
    serde_json::from_slice(&data).map_err(|e| LoadError::Malformed(e.to_string()))
}

/// Failure to load a single submission
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Stored submission is not valid JSON: {0}")]
    Malformed(String),
}
