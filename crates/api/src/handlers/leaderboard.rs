//! Enrollment leaderboard.
//!
//! Without `since` the ranking uses each hospital's stored `enrolled_count`,
//! which admins may correct by hand. With `since` it is recomputed from the
//! enrollment records inside the window.

use axum::extract::{Path, Query, State};
use trialsite_core::leaderboard::{rank_sites, tally_since, Leaderboard, SiteTally};
use trialsite_core::pagination::{clamp_limit, MAX_LIMIT};
use trialsite_core::types::DbId;
use trialsite_db::{EnrollmentStore, HospitalStore};

use crate::error::AppResult;
use crate::handlers::tenancy::member_of;
use crate::middleware::auth::AuthUser;
use crate::query::LeaderboardParams;
use crate::response::{ApiJson, ApiResponse};
use crate::state::AppState;

/// GET /api/company/{id}/leaderboard?limit=&since=
pub async fn get_leaderboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<ApiJson<Leaderboard>> {
    member_of(&state, &auth, id).await?;

    let hospitals = state.store.list_hospitals(id).await?;
    let windowed = match params.since {
        Some(since) => {
            let dates = state.store.enrollment_dates(id).await?;
            Some(tally_since(dates, Some(since)))
        }
        None => None,
    };

    let sites: Vec<SiteTally> = hospitals
        .into_iter()
        .filter(|h| h.is_active)
        .map(|h| {
            let enrolled = match &windowed {
                Some(counts) => counts.get(&h.id).copied().unwrap_or(0),
                None => i64::from(h.enrolled_count),
            };
            SiteTally {
                hospital_id: h.id,
                name: h.name,
                city: h.city,
                country: h.country,
                enrolled,
                target: h.target_enrollment,
            }
        })
        .collect();

    let limit = params
        .limit
        .map(|l| clamp_limit(Some(l), MAX_LIMIT, MAX_LIMIT) as usize);
    Ok(ApiResponse::ok(rank_sites(sites, limit)))
}
