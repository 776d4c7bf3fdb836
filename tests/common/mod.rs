//! Shared helpers for router-level tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;

use pretest_server::auth::AuthService;
use pretest_server::db::{AdminRepository, DbError, InMemoryAdminRepository};
use pretest_server::models::AdminUser;
use pretest_server::routes::{self, RouterOptions};
use pretest_server::state::{AppSettings, AppState};
use pretest_server::storage::{MemoryStore, ObjectInfo, ObjectStore, StorageError};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const SESSION_SECRET: &str = "integration-test-secret";
pub const PREFIX: &str = "submissions/";

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub auth: Arc<AuthService>,
}

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

/// Router over in-memory storage with one provisioned admin
pub async fn spawn_app() -> TestApp {
    spawn_app_with_upload_limit(10 * 1024 * 1024).await
}

pub async fn spawn_app_with_upload_limit(max_upload_bytes: usize) -> TestApp {
    let store = MemoryStore::new();
    let auth = provisioned_auth().await;
    let router = build_router(Arc::new(store.clone()), auth.clone(), max_upload_bytes);

    TestApp {
        router,
        store,
        auth,
    }
}

/// Auth service over an in-memory repository holding the test admin
pub async fn provisioned_auth() -> Arc<AuthService> {
    let auth = auth_over(Arc::new(InMemoryAdminRepository::new()));
    auth.ensure_admin(ADMIN_USER, ADMIN_PASSWORD)
        .await
        .expect("admin provisioning");
    auth
}

pub fn auth_over(admins: Arc<dyn AdminRepository>) -> Arc<AuthService> {
    Arc::new(AuthService::new(
        admins,
        SESSION_SECRET.to_string(),
        3600,
        false,
    ))
}

pub fn build_router(
    store: Arc<dyn ObjectStore>,
    auth: Arc<AuthService>,
    max_upload_bytes: usize,
) -> Router {
    let state = AppState::new(
        auth,
        store,
        AppSettings {
            submission_prefix: PREFIX.to_string(),
            questions_path: manifest_path("questions.json"),
            test_minutes: 20,
        },
    );

    routes::app(
        state,
        RouterOptions {
            static_dir: manifest_path("static"),
            max_upload_bytes,
            hsts: false,
        },
    )
}

/// Object store whose backend is always unavailable
pub struct UnavailableStore;

impl UnavailableStore {
    fn error() -> StorageError {
        StorageError::UnexpectedResponse {
            status: 503,
            body: "backend unavailable".to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for UnavailableStore {
    async fn put(&self, _name: &str, _data: Bytes, _content_type: &str) -> Result<(), StorageError> {
        Err(Self::error())
    }

    async fn get(&self, _name: &str) -> Result<Bytes, StorageError> {
        Err(Self::error())
    }

    async fn list(&self, _prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        Err(Self::error())
    }

    fn backend(&self) -> &'static str {
        "unavailable"
    }
}

/// Admin repository whose database is always unreachable
pub struct UnreachableAdminRepository;

#[async_trait]
impl AdminRepository for UnreachableAdminRepository {
    async fn find_by_username(&self, _username: &str) -> Result<Option<AdminUser>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn insert_if_absent(
        &self,
        _username: &str,
        _password_hash: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn health(&self) -> Result<(), DbError> {
        Err(DbError::HealthCheckError("pool timed out".to_string()))
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).expect("JSON body")
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// `name=value` part of the session Set-Cookie header, if any
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("pretest_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_login(username: &str, password: &str) -> Request<Body> {
    let form = format!(
        "username={}&password={}",
        urlencoding::encode(username),
        urlencoding::encode(password)
    );
    Request::post("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

const BOUNDARY: &str = "----pretest-test-boundary";

/// multipart/form-data request with text fields and an optional PDF part
pub fn post_report(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::post("/upload-report")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}
