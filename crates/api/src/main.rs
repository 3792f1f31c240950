use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trialsite_api::background::login_code_sweeper;
use trialsite_api::bootstrap::ensure_super_admin;
use trialsite_api::config::{ServerConfig, StorageBackend};
use trialsite_api::router::build_app_router;
use trialsite_api::state::AppState;
use trialsite_db::{JsonStore, PgStore, Store};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trialsite_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let store = open_store(&config.storage).await;
    tracing::info!(backend = store.backend_name(), "Storage ready");

    // --- Bootstrap admin ---
    if let Some(admin) = &config.bootstrap_admin {
        if let Err(e) = ensure_super_admin(store.as_ref(), admin).await {
            panic!("Failed to create bootstrap super admin: {e}");
        }
    }

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );

    // --- App state ---
    let state = AppState::new(store, config.clone());

    // --- Login code sweeper ---
    let sweeper_cancel = CancellationToken::new();
    let sweeper_handle = tokio::spawn(login_code_sweeper::run(
        Arc::clone(&state.login_codes),
        login_code_sweeper::SWEEP_INTERVAL,
        sweeper_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweeper_cancel.cancel();
    if tokio::time::timeout(shutdown_timeout, sweeper_handle)
        .await
        .is_err()
    {
        tracing::warn!("Login code sweeper did not stop in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured storage backend, failing fast on any error.
async fn open_store(backend: &StorageBackend) -> Arc<dyn Store> {
    match backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(JsonStore::in_memory())
        }
        StorageBackend::Json { path } => {
            let store = JsonStore::open(path.clone())
                .await
                .unwrap_or_else(|e| panic!("Failed to open data file {}: {e}", path.display()));
            tracing::info!(path = %path.display(), "JSON data file opened");
            Arc::new(store)
        }
        StorageBackend::Postgres { database_url } => {
            let pool = trialsite_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            trialsite_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            trialsite_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
