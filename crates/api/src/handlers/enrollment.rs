//! Handlers for enrollment records.
//!
//! Recording an enrollment and bumping the hospital's `enrolled_count`
//! happen in one storage operation, so the counter tracks the records
//! created through the API.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use trialsite_core::error::CoreError;
use trialsite_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use trialsite_core::roles::ROLE_INVESTIGATOR;
use trialsite_core::tenant::scoped;
use trialsite_core::types::DbId;
use trialsite_core::validation::validate_not_blank;
use trialsite_db::models::enrollment::{CreateEnrollment, Enrollment};
use trialsite_db::{EnrollmentStore, UserStore};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::hospital::fetch_hospital;
use crate::handlers::tenancy::{admin_of, member_of};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{EnrollmentListParams, PaginationParams};
use crate::response::{deleted, ApiJson, ApiResponse, Created};
use crate::state::AppState;

/// GET /api/company/{id}/hospitals/{hospital_id}/enrollments?limit=&offset=
pub async fn list_hospital_enrollments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, hospital_id)): Path<(DbId, DbId)>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiJson<Vec<Enrollment>>> {
    member_of(&state, &auth, company_id).await?;
    fetch_hospital(&state, company_id, hospital_id).await?;

    let enrollments = state
        .store
        .list_enrollments(
            company_id,
            Some(hospital_id),
            clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(params.offset),
        )
        .await?;
    Ok(ApiResponse::ok(enrollments))
}

/// POST /api/company/{id}/hospitals/{hospital_id}/enrollments
///
/// Record a subject enrollment at a site. Returns 409 if the subject code
/// is already enrolled in this company.
pub async fn create_enrollment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, hospital_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateEnrollment>,
) -> AppResult<Created<Enrollment>> {
    member_of(&state, &auth, company_id).await?;
    input.validate()?;
    validate_not_blank("subject_code", &input.subject_code)?;

    if input.enrolled_at.is_some_and(|at| at > Utc::now()) {
        return Err(AppError::Core(CoreError::Validation(
            "enrolled_at cannot be in the future".into(),
        )));
    }

    let hospital = fetch_hospital(&state, company_id, hospital_id).await?;
    if !hospital.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Hospital {hospital_id} is inactive and cannot record enrollments"
        ))));
    }

    if auth.role == ROLE_INVESTIGATOR {
        ensure_assigned_site(&state, &auth, hospital_id).await?;
    }

    let input = CreateEnrollment {
        subject_code: input.subject_code.trim().to_string(),
        ..input
    };
    let enrollment = state
        .store
        .record_enrollment(company_id, hospital_id, Some(auth.user_id), &input)
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        company_id,
        hospital_id,
        enrollment_id = enrollment.id,
        "Enrollment recorded"
    );
    Ok(ApiResponse::created("Enrollment recorded", enrollment))
}

/// GET /api/company/{id}/enrollments?hospital_id=&limit=&offset=
pub async fn list_enrollments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<DbId>,
    Query(params): Query<EnrollmentListParams>,
) -> AppResult<ApiJson<Vec<Enrollment>>> {
    member_of(&state, &auth, company_id).await?;
    if let Some(hospital_id) = params.hospital_id {
        fetch_hospital(&state, company_id, hospital_id).await?;
    }

    let enrollments = state
        .store
        .list_enrollments(
            company_id,
            params.hospital_id,
            clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(params.offset),
        )
        .await?;
    Ok(ApiResponse::ok(enrollments))
}

/// DELETE /api/company/{id}/enrollments/{enrollment_id}
///
/// Withdraw an enrollment recorded in error and decrement the site counter.
pub async fn withdraw_enrollment(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, enrollment_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<()>> {
    admin_of(&state, &auth, company_id).await?;

    let enrollment = state.store.find_enrollment(enrollment_id).await?;
    let enrollment = scoped(
        enrollment,
        |e| e.company_id,
        company_id,
        "Enrollment",
        enrollment_id,
    )?;

    state.store.withdraw_enrollment(enrollment.id).await?;

    tracing::info!(
        user_id = auth.user_id,
        enrollment_id,
        hospital_id = enrollment.hospital_id,
        "Enrollment withdrawn"
    );
    Ok(deleted("Enrollment withdrawn"))
}

/// Investigators bound to a site may only record enrollments there.
async fn ensure_assigned_site(
    state: &AppState,
    auth: &AuthUser,
    hospital_id: DbId,
) -> AppResult<()> {
    let assigned = state
        .store
        .find_user(auth.user_id)
        .await?
        .and_then(|u| u.hospital_id);

    match assigned {
        Some(site) if site != hospital_id => Err(AppError::Core(CoreError::Forbidden(
            "Investigators can only record enrollments at their assigned hospital".into(),
        ))),
        _ => Ok(()),
    }
}
