//! Handlers for companies (tenants).
//!
//! Creating and deleting companies is reserved to super admins. Company
//! admins may edit their own company's profile and branding but not its
//! active flag.

use axum::extract::{Path, State};
use axum::Json;
use trialsite_core::error::CoreError;
use trialsite_core::types::DbId;
use trialsite_core::validation::{slugify, validate_color_hex, validate_slug};
use trialsite_db::models::company::{Company, CreateCompany, PublicCompany, UpdateCompany};
use trialsite_db::CompanyStore;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::tenancy::{admin_of, member_of};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireSuperAdmin};
use crate::response::{deleted, ApiJson, ApiResponse, Created};
use crate::state::AppState;

/// GET /api/companies
///
/// Super admins see every company; everyone else sees only their own.
pub async fn list_companies(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<ApiJson<Vec<Company>>> {
    let companies = if auth.is_super_admin() {
        state.store.list_companies().await?
    } else {
        match auth.company_id {
            Some(id) => state
                .store
                .find_company(id)
                .await?
                .filter(|c| c.is_active)
                .into_iter()
                .collect(),
            None => Vec::new(),
        }
    };
    Ok(ApiResponse::ok(companies))
}

/// POST /api/companies
///
/// Create a company. The slug defaults to a slugified name.
pub async fn create_company(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Json(input): Json<CreateCompany>,
) -> AppResult<Created<Company>> {
    input.validate()?;
    if let Some(color) = input.primary_color.as_deref() {
        validate_color_hex(color)?;
    }

    let slug = match input.slug.as_deref() {
        Some(explicit) => explicit.trim().to_string(),
        None => slugify(&input.name),
    };
    validate_slug(&slug)?;

    let company = state.store.create_company(&input, &slug).await?;

    tracing::info!(
        user_id = admin.user_id,
        company_id = company.id,
        slug = %company.slug,
        "Company created"
    );

    Ok(ApiResponse::created("Company created", company))
}

/// GET /api/companies/lookup/{slug}
///
/// Public branding lookup used by the mobile client before sign-in.
/// Inactive companies are reported as missing.
pub async fn lookup_company(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiJson<PublicCompany>> {
    let company = state
        .store
        .find_company_by_slug(&slug.to_lowercase())
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::NotFound(format!("Company '{slug}' not found")))?;

    Ok(ApiResponse::ok(PublicCompany::from(company)))
}

/// GET /api/company/{id}
pub async fn get_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<Company>> {
    let company = member_of(&state, &auth, id).await?;
    Ok(ApiResponse::ok(company))
}

/// PUT /api/company/{id}
///
/// Partial update. Only super admins may toggle `is_active`.
pub async fn update_company(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<ApiJson<Company>> {
    admin_of(&state, &auth, id).await?;
    input.validate()?;

    if input.is_active.is_some() && !auth.is_super_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only a super admin can change a company's active status".into(),
        )));
    }
    if let Some(color) = input.primary_color.as_deref() {
        validate_color_hex(color)?;
    }

    let company = state
        .store
        .update_company(id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;

    tracing::info!(user_id = auth.user_id, company_id = id, "Company updated");
    Ok(ApiResponse::with_message("Company updated", company))
}

/// DELETE /api/company/{id}
///
/// Soft-delete a company. Its slug stays reserved.
pub async fn delete_company(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<()>> {
    if !state.store.delete_company(id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }));
    }

    tracing::info!(user_id = admin.user_id, company_id = id, "Company deleted");
    Ok(deleted("Company deleted"))
}
