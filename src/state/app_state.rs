//! Application state shared across handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::storage::ObjectStore;

use axum::extract::FromRef;

/// Request-independent settings the handlers read
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Object-name prefix for submissions and reports
    pub submission_prefix: String,

    /// Question bank file, read on every request
    pub questions_path: PathBuf,

    /// Time limit shown to test-takers
    pub test_minutes: u32,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub store: Arc<dyn ObjectStore>,
    pub settings: Arc<AppSettings>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        store: Arc<dyn ObjectStore>,
        settings: AppSettings,
    ) -> Self {
        Self {
            auth_service,
            store,
            settings: Arc::new(settings),
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ObjectStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<AppSettings> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.settings.clone()
    }
}
