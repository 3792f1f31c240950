//! Handlers for company users (admins and investigators).
//!
//! Listing and reading require membership of the company; every write
//! requires a company admin (or super admin). Super admins are platform
//! accounts and can never be created or promoted under a company.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use trialsite_core::error::CoreError;
use trialsite_core::roles::{validate_role, ROLE_INVESTIGATOR, ROLE_SUPER_ADMIN};
use trialsite_core::types::DbId;
use trialsite_core::validation::{normalize_email, validate_not_blank};
use trialsite_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use trialsite_db::{HospitalStore, UserStore};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::handlers::tenancy::{admin_of, member_of};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ApiJson, ApiResponse, Created};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /company/{id}/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    /// Defaults to `investigator`.
    pub role: Option<String>,
    pub hospital_id: Option<DbId>,
    /// Omit to create a code-only account.
    pub password: Option<String>,
}

/// Request body for `PUT /company/{id}/users/{user_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub hospital_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /company/{id}/users/{user_id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/company/{id}/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<DbId>,
) -> AppResult<ApiJson<Vec<UserResponse>>> {
    member_of(&state, &auth, company_id).await?;
    let users = state.store.list_users(company_id).await?;
    Ok(ApiResponse::ok(users.iter().map(UserResponse::from).collect()))
}

/// POST /api/company/{id}/users
///
/// Create a user in the company. Returns 409 if the email is taken.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    validate_not_blank("first_name", &input.first_name)?;
    validate_not_blank("last_name", &input.last_name)?;

    let role = input
        .role
        .unwrap_or_else(|| ROLE_INVESTIGATOR.to_string());
    ensure_company_role(&role)?;

    if let Some(hospital_id) = input.hospital_id {
        ensure_hospital_in_company(&state, company_id, hospital_id).await?;
    }

    let password_hash = match input.password.as_deref() {
        Some(password) => {
            validate_password_strength(password, MIN_PASSWORD_LENGTH)
                .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
            )
        }
        None => None,
    };

    let create_dto = CreateUser {
        company_id: Some(company_id),
        hospital_id: input.hospital_id,
        email: normalize_email(&input.email),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        role,
        password_hash,
    };

    let user = state.store.create_user(&create_dto).await?;

    tracing::info!(
        user_id = auth.user_id,
        company_id,
        new_user_id = user.id,
        role = %user.role,
        "User created"
    );

    Ok(ApiResponse::created("User created", UserResponse::from(&user)))
}

/// GET /api/company/{id}/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<UserResponse>> {
    member_of(&state, &auth, company_id).await?;
    let user = fetch_user(&state, company_id, user_id).await?;
    Ok(ApiResponse::ok(UserResponse::from(&user)))
}

/// PUT /api/company/{id}/users/{user_id}
///
/// Update profile, role, site assignment or active flag (not the password).
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, user_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<ApiJson<UserResponse>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    if let Some(first_name) = input.first_name.as_deref() {
        validate_not_blank("first_name", first_name)?;
    }
    if let Some(last_name) = input.last_name.as_deref() {
        validate_not_blank("last_name", last_name)?;
    }
    fetch_user(&state, company_id, user_id).await?;

    if let Some(role) = input.role.as_deref() {
        ensure_company_role(role)?;
    }
    if let Some(hospital_id) = input.hospital_id {
        ensure_hospital_in_company(&state, company_id, hospital_id).await?;
    }
    if input.is_active == Some(false) {
        ensure_not_self(&auth, user_id)?;
    }

    let update_dto = UpdateUser {
        hospital_id: input.hospital_id,
        first_name: input.first_name.map(|s| s.trim().to_string()),
        last_name: input.last_name.map(|s| s.trim().to_string()),
        role: input.role,
        is_active: input.is_active,
    };

    let user = state
        .store
        .update_user(user_id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    tracing::info!(user_id = auth.user_id, target_user_id = user_id, "User updated");
    Ok(ApiResponse::with_message("User updated", UserResponse::from(&user)))
}

/// DELETE /api/company/{id}/users/{user_id}
///
/// Deactivate a user. Users are never hard-deleted so their enrollments
/// keep a valid investigator reference.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<()>> {
    admin_of(&state, &auth, company_id).await?;
    fetch_user(&state, company_id, user_id).await?;
    ensure_not_self(&auth, user_id)?;

    let changed = state.store.deactivate_user(user_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        target_user_id = user_id,
        changed,
        "User deactivated"
    );
    Ok(ApiResponse::with_message("User deactivated", ()))
}

/// POST /api/company/{id}/users/{user_id}/reset-password
///
/// Admin-initiated password reset.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, user_id)): Path<(DbId, DbId)>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<ApiJson<()>> {
    admin_of(&state, &auth, company_id).await?;
    fetch_user(&state, company_id, user_id).await?;

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !state.store.update_password(user_id, &hashed).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }));
    }

    tracing::info!(user_id = auth.user_id, target_user_id = user_id, "Password reset");
    Ok(ApiResponse::with_message("Password reset", ()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a user of `company_id`; users of other companies are not found.
async fn fetch_user(state: &AppState, company_id: DbId, user_id: DbId) -> AppResult<User> {
    match state.store.find_user(user_id).await? {
        Some(user) if user.company_id == Some(company_id) => Ok(user),
        _ => Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })),
    }
}

fn ensure_company_role(role: &str) -> AppResult<()> {
    validate_role(role)?;
    if role == ROLE_SUPER_ADMIN {
        return Err(AppError::Core(CoreError::Validation(
            "super_admin accounts cannot belong to a company".into(),
        )));
    }
    Ok(())
}

fn ensure_not_self(auth: &AuthUser, user_id: DbId) -> AppResult<()> {
    if auth.user_id == user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        )));
    }
    Ok(())
}

async fn ensure_hospital_in_company(
    state: &AppState,
    company_id: DbId,
    hospital_id: DbId,
) -> AppResult<()> {
    match state.store.find_hospital(hospital_id).await? {
        Some(h) if h.company_id == company_id => Ok(()),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "Hospital {hospital_id} does not belong to this company"
        )))),
    }
}
