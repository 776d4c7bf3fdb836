//! Configuration management for the pretest server
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default bucket holding submissions and reports
pub const DEFAULT_BUCKET: &str = "ged-pretest-submission";

/// Public Google Cloud Storage API endpoint
pub const DEFAULT_GCS_ENDPOINT: &str = "https://storage.googleapis.com";

const DEV_SESSION_SECRET: &str = "development-session-secret-change-in-production";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Object storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Service-account key JSON, as found in `GOOGLE_CREDENTIALS`
    pub credentials_json: Option<String>,

    /// Bucket name
    pub bucket: String,

    /// Storage API base URL
    pub endpoint: String,

    /// Object-name prefix for submissions and reports
    pub prefix: String,
}

impl StorageConfig {
    /// True when the endpoint was pointed somewhere other than the public API
    pub fn uses_custom_endpoint(&self) -> bool {
        self.endpoint.trim_end_matches('/') != DEFAULT_GCS_ENDPOINT
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Current environment
    pub environment: Environment,

    /// Bind host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// Object storage settings
    pub storage: StorageConfig,

    /// Question bank served to test-takers
    pub questions_path: PathBuf,

    /// Directory served under /static
    pub static_dir: PathBuf,

    /// Time limit for the test, in minutes
    pub test_minutes: u32,

    /// Secret used to sign admin session cookies
    pub session_secret: String,

    /// Admin session lifetime in seconds (default: 43200 = 12 hours)
    pub session_ttl_seconds: i64,

    /// Admin account created at startup when both are set
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,

    /// Body limit for report uploads
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::from_str(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .unwrap_or(5);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let storage = StorageConfig {
            credentials_json: env::var("GOOGLE_CREDENTIALS")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            bucket: env::var("GCS_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
            endpoint: env::var("GCS_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GCS_ENDPOINT.to_string()),
            prefix: normalize_prefix(
                &env::var("SUBMISSION_PREFIX").unwrap_or_else(|_| "submissions/".to_string()),
            ),
        };

        let questions_path = env::var("QUESTIONS_PATH")
            .unwrap_or_else(|_| "questions.json".to_string())
            .into();

        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "static".to_string())
            .into();

        let test_minutes = env::var("TEST_DURATION_MINUTES")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u32>()
            .map_err(|_| {
                ConfigError::InvalidValue("TEST_DURATION_MINUTES must be a number".to_string())
            })?;

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => {
                return Err(ConfigError::MissingEnvVar("SESSION_SECRET".to_string()))
            }
            _ => DEV_SESSION_SECRET.to_string(),
        };

        if environment.is_production()
            && storage.credentials_json.is_none()
            && !storage.uses_custom_endpoint()
        {
            return Err(ConfigError::MissingEnvVar("GOOGLE_CREDENTIALS".to_string()));
        }

        let session_ttl_seconds = env::var("SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| "43200".to_string())
            .parse::<i64>()
            .unwrap_or(43200);

        let admin_username = env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty());
        let admin_password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".to_string())
            .parse::<usize>()
            .unwrap_or(10 * 1024 * 1024);

        Ok(Config {
            database_url,
            environment,
            host,
            port,
            db_max_connections,
            log_level,
            storage,
            questions_path,
            static_dir,
            test_minutes,
            session_secret,
            session_ttl_seconds,
            admin_username,
            admin_password,
            max_upload_bytes,
        })
    }

    /// Get database URL (useful for logging masked version)
    pub fn database_url_masked(&self) -> String {
        // Mask password in database URL for logging
        if let Some(at_pos) = self.database_url.find('@') {
            if let Some(colon_pos) = self.database_url[..at_pos].rfind(':') {
                let prefix = &self.database_url[..colon_pos + 1];
                let suffix = &self.database_url[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
        self.database_url.clone()
    }
}

/// Ensure a non-empty prefix ends with a single '/'
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}
