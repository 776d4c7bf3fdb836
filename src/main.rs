//! GED Pretest Server
//!
//! Serves the timed pretest, stores submissions and PDF reports in object
//! storage, and hosts the admin dashboard over the stored results.

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

use pretest_server::auth::AuthService;
use pretest_server::config::Config;
use pretest_server::db::{self, PgAdminRepository};
use pretest_server::routes::{self, RouterOptions};
use pretest_server::state::{AppSettings, AppState};
use pretest_server::storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting pretest server");

    let db_pool = db::create_pool(&config).await?;
    db::run_migrations(&db_pool).await?;

    let auth_service = Arc::new(AuthService::new(
        Arc::new(PgAdminRepository::new(db_pool.clone())),
        config.session_secret.clone(),
        config.session_ttl_seconds,
        config.environment.is_production(),
    ));

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        auth_service
            .ensure_admin(username, password)
            .await
            .context("Failed to provision admin account")?;
    }

    let store = storage::from_config(&config.storage).context("Failed to set up object storage")?;

    let app_state = AppState::new(
        auth_service,
        store,
        AppSettings {
            submission_prefix: config.storage.prefix.clone(),
            questions_path: config.questions_path.clone(),
            test_minutes: config.test_minutes,
        },
    );

    let app = routes::app(
        app_state,
        RouterOptions {
            static_dir: config.static_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
            hsts: config.environment.is_production(),
        },
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("HOST/PORT do not form a valid socket address")?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Admin dashboard at http://{}/admin", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
