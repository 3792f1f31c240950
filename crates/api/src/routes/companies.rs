//! Route definitions for the `/companies` collection.

use axum::routing::get;
use axum::Router;

use crate::handlers::company;
use crate::state::AppState;

/// ```text
/// GET  /companies                -> list_companies
/// POST /companies                -> create_company (super admin)
/// GET  /companies/lookup/{slug}  -> lookup_company (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(company::list_companies).post(company::create_company),
        )
        .route("/companies/lookup/{slug}", get(company::lookup_company))
}
