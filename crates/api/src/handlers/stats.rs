//! Company dashboard statistics.

use axum::extract::{Path, State};
use trialsite_core::types::DbId;
use trialsite_db::models::stats::CompanyStats;
use trialsite_db::StatsStore;

use crate::error::AppResult;
use crate::handlers::tenancy::member_of;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiJson, ApiResponse};
use crate::state::AppState;

/// GET /api/company/{id}/stats
///
/// Headline counters for the company dashboard.
pub async fn company_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<CompanyStats>> {
    member_of(&state, &auth, id).await?;
    let stats = state.store.company_stats(id).await?;
    Ok(ApiResponse::ok(stats))
}
