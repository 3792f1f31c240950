pub mod auth;
pub mod companies;
pub mod company;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      password login (public)
/// /auth/login-code                                 issue login code (public)
/// /auth/login-code/verify                          exchange login code (public)
/// /auth/me                                         caller profile
/// /auth/change-password                            set own password
///
/// /companies                                       list, create (super admin)
/// /companies/lookup/{slug}                         public branding
///
/// /company/{id}                                    get, update, delete
/// /company/{id}/stats                              dashboard counters
/// /company/{id}/leaderboard                        enrollment ranking
/// /company/{id}/users[/{user_id}]                  user management
/// /company/{id}/users/{user_id}/reset-password     admin password reset
/// /company/{id}/hospitals[/{hospital_id}]          trial sites
/// /company/{id}/hospitals/{hospital_id}/enrollments  per-site enrollments
/// /company/{id}/enrollments[/{enrollment_id}]      company-wide enrollments
/// /company/{id}/news[/{news_id}]                   news posts
/// /company/{id}/pdfs[/{pdf_id}]                    PDF library
/// /company/{id}/training[/{material_id}]           training materials
/// /company/{id}/protocols[/{protocol_id}]          study protocols
/// /company/{id}/protocols/current                  current protocol
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(companies::router())
        .merge(company::router())
}
