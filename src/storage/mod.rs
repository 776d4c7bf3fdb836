//! Object storage for submissions and reports
//!
//! Handlers talk to an [`ObjectStore`]; production uses Google Cloud Storage,
//! development and tests can run against the in-process store.

mod credentials;
mod gcs;
mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::config::StorageConfig;

pub use credentials::{ServiceAccountKey, TokenProvider};
pub use gcs::GcsStore;
pub use memory::MemoryStore;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object name: {0}")]
    InvalidName(String),

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Storage request failed: {0}")]
    Request(String),

    #[error("Unexpected storage response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::Request(err.to_string())
    }
}

/// Metadata of a stored object
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ObjectInfo {
    pub name: String,
    pub size: u64,
    pub content_type: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

/// Minimal blob store used by the handlers
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create or replace an object
    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Fetch an object's contents
    async fn get(&self, name: &str) -> Result<Bytes, StorageError>;

    /// List every object whose name starts with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError>;

    /// Backend name for health reporting
    fn backend(&self) -> &'static str;
}

/// Reject names that could escape the submission prefix
pub fn validate_object_name(name: &str) -> Result<(), StorageError> {
    if name.trim().is_empty() {
        return Err(StorageError::InvalidName("name is empty".to_string()));
    }
    if name.starts_with('/') {
        return Err(StorageError::InvalidName(format!("'{}' is absolute", name)));
    }
    if name.contains('\\') || name.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidName(format!(
            "'{}' contains a forbidden path segment",
            name
        )));
    }
    Ok(())
}

/// Build the configured object store
///
/// Credentials select GCS. A custom endpoint without credentials talks to an
/// emulator anonymously. With neither, development falls back to memory.
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match &config.credentials_json {
        Some(raw) => {
            let key = ServiceAccountKey::from_json(raw)?;
            tracing::info!(
                bucket = %config.bucket,
                client_email = %key.client_email,
                "Using Google Cloud Storage"
            );
            Ok(Arc::new(GcsStore::new(
                config.endpoint.clone(),
                config.bucket.clone(),
                Some(TokenProvider::new(key)),
            )))
        }
        None if config.uses_custom_endpoint() => {
            tracing::info!(
                endpoint = %config.endpoint,
                bucket = %config.bucket,
                "Using storage endpoint without credentials"
            );
            Ok(Arc::new(GcsStore::new(
                config.endpoint.clone(),
                config.bucket.clone(),
                None,
            )))
        }
        None => {
            tracing::warn!("GOOGLE_CREDENTIALS not set, submissions are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_object_name() {
        assert!(validate_object_name("submissions/submission_1.json").is_ok());
        assert!(validate_object_name("GED_Result_Jane_Doe.pdf").is_ok());

        assert!(validate_object_name("").is_err());
        assert!(validate_object_name("   ").is_err());
        assert!(validate_object_name("/etc/passwd").is_err());
        assert!(validate_object_name("submissions/../secrets.json").is_err());
        assert!(validate_object_name("..").is_err());
        assert!(validate_object_name("a\\b.pdf").is_err());
    }

    #[test]
    fn test_from_config_without_credentials_uses_memory() {
        let config = StorageConfig {
            credentials_json: None,
            bucket: "bucket".to_string(),
            endpoint: crate::config::DEFAULT_GCS_ENDPOINT.to_string(),
            prefix: "submissions/".to_string(),
        };
        let store = from_config(&config).unwrap();
        assert_eq!(store.backend(), "memory");
    }

    #[test]
    fn test_from_config_with_emulator_endpoint() {
        let config = StorageConfig {
            credentials_json: None,
            bucket: "bucket".to_string(),
            endpoint: "http://localhost:4443".to_string(),
            prefix: "submissions/".to_string(),
        };
        let store = from_config(&config).unwrap();
        assert_eq!(store.backend(), "gcs");
    }

    #[test]
    fn test_from_config_rejects_bad_credentials() {
        let config = StorageConfig {
            credentials_json: Some("{not json".to_string()),
            bucket: "bucket".to_string(),
            endpoint: crate::config::DEFAULT_GCS_ENDPOINT.to_string(),
            prefix: "submissions/".to_string(),
        };
        assert!(matches!(
            from_config(&config),
            Err(StorageError::Credentials(_))
        ));
    }
}
