use std::sync::Arc;

use trialsite_db::Store;

use crate::auth::login_code::LoginCodeStore;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Storage backend selected at startup.
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
    /// Pending one-time login codes, keyed by email.
    pub login_codes: Arc<LoginCodeStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        let login_codes = Arc::new(LoginCodeStore::new(config.login_codes.clone()));
        Self {
            store,
            config: Arc::new(config),
            login_codes,
        }
    }
}
