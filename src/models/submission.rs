//! Submission documents and their object names

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Per-tag tally computed by the browser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStat {
    pub correct: String,
    pub total: String,
}

/// One answered question
#[derive(Debug, Clone, Default)]
pub struct FeedbackItem {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub tags: Vec<String>,
}

/// Rendering view of a stored submission
///
/// Submissions are free-form JSON objects, so every field is read leniently:
/// missing or null fields are empty and values of an unexpected type are
/// shown as their JSON text.
#[derive(Debug, Clone, Default)]
pub struct SubmissionRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub score: Option<String>,
    pub total: Option<String>,
    pub tag_stats: BTreeMap<String, TagStat>,
    pub weak_skills: Vec<String>,
    pub feedback: Vec<FeedbackItem>,
    pub timestamp: Option<String>,
}

/// Text of a JSON value for display; strings unquoted, null as None
pub fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn text_of(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(field_text)
}

fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(field_text).collect(),
        Some(other) => field_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

impl TagStat {
    fn from_value(value: &Value) -> Self {
        Self {
            correct: text_of(value, "correct").unwrap_or_else(|| "0".to_string()),
            total: text_of(value, "total").unwrap_or_else(|| "0".to_string()),
        }
    }
}

impl FeedbackItem {
    fn from_value(value: &Value) -> Self {
        Self {
            question: text_of(value, "question").unwrap_or_default(),
            user_answer: text_of(value, "userAnswer").unwrap_or_default(),
            correct_answer: text_of(value, "correctAnswer").unwrap_or_default(),
            is_correct: value
                .get("isCorrect")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            tags: text_list(value.get("tags")),
        }
    }
}

impl SubmissionRecord {
    pub fn from_value(value: &Value) -> Self {
        let tag_stats = value
            .get("tagStats")
            .and_then(Value::as_object)
            .map(|stats| {
                stats
                    .iter()
                    .map(|(tag, stat)| (tag.clone(), TagStat::from_value(stat)))
                    .collect()
            })
            .unwrap_or_default();

        let feedback = value
            .get("feedback")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(FeedbackItem::from_value).collect())
            .unwrap_or_default();

        Self {
            name: text_of(value, "name"),
            email: text_of(value, "email"),
            score: text_of(value, "score"),
            total: text_of(value, "total"),
            tag_stats,
            weak_skills: text_list(value.get("weakSkills")),
            feedback,
            timestamp: text_of(value, "timestamp"),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    pub fn display_email(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    pub fn score_line(&self) -> String {
        match (&self.score, &self.total) {
            (Some(score), Some(total)) => format!("{} / {}", score, total),
            (Some(score), None) => score.clone(),
            _ => "n/a".to_string(),
        }
    }
}

/// Attach the server timestamp to a submission body
///
/// Returns the stamped object and the timestamp string. Anything other than a
/// JSON object is rejected.
pub fn stamp_submission(
    body: Value,
    now: DateTime<Utc>,
) -> Result<(Map<String, Value>, String), String> {
    let mut submission = match body {
        Value::Object(map) => map,
        other => {
            return Err(format!(
                "submission must be a JSON object, got {}",
                json_kind(&other)
            ))
        }
    };

    let timestamp = now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    submission.insert("timestamp".to_string(), Value::String(timestamp.clone()));

    Ok((submission, timestamp))
}

/// `<prefix>submission_<timestamp>.json`, colons replaced so the name is path-safe
pub fn submission_object_name(prefix: &str, timestamp: &str) -> String {
    format!("{}submission_{}.json", prefix, timestamp.replace(':', "-"))
}

/// Object name of the report that belongs to a submission JSON
pub fn pdf_name_for(json_name: &str) -> String {
    json_name.replace(".json", ".pdf")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap()
            + chrono::Duration::microseconds(42)
    }

    #[test]
    fn test_stamp_adds_timestamp_and_keeps_fields() {
        let body = json!({ "name": "Ana", "email": "ana@example.com", "score": 7, "extra": [1, 2] });
        let (stamped, timestamp) = stamp_submission(body, fixed_time()).unwrap();

        assert_eq!(timestamp, "2024-05-01T09:30:15.000042");
        assert_eq!(stamped["timestamp"], json!("2024-05-01T09:30:15.000042"));
        assert_eq!(stamped["name"], json!("Ana"));
        assert_eq!(stamped["extra"], json!([1, 2]));
        assert_eq!(stamped.len(), 5);
    }

    #[test]
    fn test_stamp_overwrites_client_timestamp() {
        let body = json!({ "timestamp": "yesterday" });
        let (stamped, _) = stamp_submission(body, fixed_time()).unwrap();
        assert_eq!(stamped["timestamp"], json!("2024-05-01T09:30:15.000042"));
    }

    #[test]
    fn test_stamp_rejects_non_objects() {
        assert!(stamp_submission(json!([1, 2, 3]), fixed_time()).is_err());
        assert!(stamp_submission(json!("hello"), fixed_time()).is_err());
        assert!(stamp_submission(Value::Null, fixed_time()).is_err());
    }

    #[test]
    fn test_submission_object_name() {
        assert_eq!(
            submission_object_name("submissions/", "2024-05-01T09:30:15.000042"),
            "submissions/submission_2024-05-01T09-30-15.000042.json"
        );
    }

    #[test]
    fn test_pdf_name_for() {
        assert_eq!(
            pdf_name_for("submissions/submission_2024-05-01T09-30-15.000042.json"),
            "submissions/submission_2024-05-01T09-30-15.000042.pdf"
        );
    }

    #[test]
    fn test_record_from_browser_payload() {
        let value = json!({
            "name": "Ana",
            "email": "ana@example.com",
            "score": 3,
            "total": 4,
            "tagStats": { "grammar": { "correct": 1, "total": 2 } },
            "weakSkills": ["grammar"],
            "feedback": [{
                "question": "Pick one",
                "userAnswer": "A",
                "correctAnswer": "B",
                "isCorrect": false,
                "tags": ["grammar"]
            }],
            "timestamp": "2024-05-01T09:30:15.000042"
        });

        let record = SubmissionRecord::from_value(&value);
        assert_eq!(record.display_name(), "Ana");
        assert_eq!(record.score_line(), "3 / 4");
        assert_eq!(
            record.tag_stats.get("grammar"),
            Some(&TagStat {
                correct: "1".to_string(),
                total: "2".to_string()
            })
        );
        assert_eq!(record.feedback[0].correct_answer, "B");
        assert!(!record.feedback[0].is_correct);
    }

    #[test]
    fn test_record_tolerates_missing_fields() {
        let record = SubmissionRecord::from_value(&json!({}));
        assert_eq!(record.display_name(), "(unnamed)");
        assert_eq!(record.score_line(), "n/a");
        assert!(record.feedback.is_empty());
    }

    #[test]
    fn test_record_renders_unexpected_shapes() {
        let value = json!({
            "name": 42,
            "email": null,
            "score": 7.5,
            "tagStats": { "grammar": "all of it", "reading": { "correct": "x" } },
            "weakSkills": "reading",
            "feedback": [{ "userAnswer": null, "isCorrect": "yes", "tags": "grammar" }, 3]
        });

        let record = SubmissionRecord::from_value(&value);
        assert_eq!(record.display_name(), "42");
        assert_eq!(record.display_email(), "");
        assert_eq!(record.score_line(), "7.5");
        assert_eq!(record.tag_stats["grammar"].correct, "0");
        assert_eq!(record.tag_stats["reading"].correct, "x");
        assert_eq!(record.weak_skills, vec!["reading".to_string()]);
        assert_eq!(record.feedback.len(), 2);
        assert_eq!(record.feedback[0].user_answer, "");
        assert!(!record.feedback[0].is_correct);
        assert_eq!(record.feedback[0].tags, vec!["grammar".to_string()]);
    }

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(&json!("Ana")), Some("Ana".to_string()));
        assert_eq!(field_text(&json!(42)), Some("42".to_string()));
        assert_eq!(field_text(&json!({ "first": "Ana" })), Some(r#"{"first":"Ana"}"#.to_string()));
        assert_eq!(field_text(&Value::Null), None);
    }
}
