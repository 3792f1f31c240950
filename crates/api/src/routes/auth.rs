//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login              -> login
/// POST /login-code         -> request_login_code
/// POST /login-code/verify  -> verify_login_code
/// GET  /me                 -> me (requires auth)
/// POST /change-password    -> change_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/login-code", post(auth::request_login_code))
        .route("/login-code/verify", post(auth::verify_login_code))
        .route("/me", get(auth::me))
        .route("/change-password", post(auth::change_password))
}
