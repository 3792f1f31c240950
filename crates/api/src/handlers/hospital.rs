//! Handlers for hospitals (trial sites).

use axum::extract::{Path, State};
use axum::Json;
use trialsite_core::error::CoreError;
use trialsite_core::tenant::scoped;
use trialsite_core::types::DbId;
use trialsite_core::validation::validate_not_blank;
use trialsite_db::models::hospital::{CreateHospital, Hospital, UpdateHospital};
use trialsite_db::HospitalStore;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::tenancy::{admin_of, member_of};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{deleted, ApiJson, ApiResponse, Created};
use crate::state::AppState;

/// GET /api/company/{id}/hospitals
///
/// All live hospitals of the company, inactive ones included.
pub async fn list_hospitals(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<DbId>,
) -> AppResult<ApiJson<Vec<Hospital>>> {
    member_of(&state, &auth, company_id).await?;
    let hospitals = state.store.list_hospitals(company_id).await?;
    Ok(ApiResponse::ok(hospitals))
}

/// POST /api/company/{id}/hospitals
pub async fn create_hospital(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateHospital>,
) -> AppResult<Created<Hospital>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    validate_not_blank("name", &input.name)?;

    let hospital = state.store.create_hospital(company_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        company_id,
        hospital_id = hospital.id,
        "Hospital created"
    );
    Ok(ApiResponse::created("Hospital created", hospital))
}

/// GET /api/company/{id}/hospitals/{hospital_id}
pub async fn get_hospital(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, hospital_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<Hospital>> {
    member_of(&state, &auth, company_id).await?;
    let hospital = fetch_hospital(&state, company_id, hospital_id).await?;
    Ok(ApiResponse::ok(hospital))
}

/// PUT /api/company/{id}/hospitals/{hospital_id}
///
/// Partial update. Counters may be corrected by hand but never go negative.
pub async fn update_hospital(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, hospital_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateHospital>,
) -> AppResult<ApiJson<Hospital>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    if let Some(name) = input.name.as_deref() {
        validate_not_blank("name", name)?;
    }
    fetch_hospital(&state, company_id, hospital_id).await?;

    let hospital = state
        .store
        .update_hospital(hospital_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Hospital",
            id: hospital_id,
        }))?;

    tracing::info!(user_id = auth.user_id, hospital_id, "Hospital updated");
    Ok(ApiResponse::with_message("Hospital updated", hospital))
}

/// DELETE /api/company/{id}/hospitals/{hospital_id}
pub async fn delete_hospital(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, hospital_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<()>> {
    admin_of(&state, &auth, company_id).await?;
    fetch_hospital(&state, company_id, hospital_id).await?;

    state.store.delete_hospital(hospital_id).await?;

    tracing::info!(user_id = auth.user_id, hospital_id, "Hospital deleted");
    Ok(deleted("Hospital deleted"))
}

/// Load a live hospital of `company_id`; other tenants' hospitals are not found.
pub(crate) async fn fetch_hospital(
    state: &AppState,
    company_id: DbId,
    hospital_id: DbId,
) -> AppResult<Hospital> {
    let hospital = state.store.find_hospital(hospital_id).await?;
    Ok(scoped(
        hospital,
        |h| h.company_id,
        company_id,
        "Hospital",
        hospital_id,
    )?)
}
