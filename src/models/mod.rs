//! Data models for the pretest server

mod submission;

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};

pub use submission::{
    field_text, pdf_name_for, stamp_submission, submission_object_name, FeedbackItem,
    SubmissionRecord, TagStat,
};

/// Administrator account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminUser {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Entry of the question bank
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Body returned by POST /submit
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub submitted: serde_json::Map<String, serde_json::Value>,
}

/// Row of the admin dashboard
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Full object name of the submission JSON
    pub filename: String,
    /// Object name of the matching PDF report, when one was uploaded
    pub pdf_link: Option<String>,
}

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
