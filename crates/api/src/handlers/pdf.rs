//! Handlers for the company PDF library.
//!
//! Only metadata and a URL are stored; the files themselves live elsewhere.

use axum::extract::{Path, Query, State};
use axum::Json;
use trialsite_core::content::{validate_pdf_category, validate_pdf_file_name, PDF_CATEGORY_OTHER};
use trialsite_core::error::CoreError;
use trialsite_core::tenant::scoped;
use trialsite_core::types::DbId;
use trialsite_core::validation::validate_not_blank;
use trialsite_db::models::pdf::{CreatePdf, Pdf, UpdatePdf};
use trialsite_db::PdfStore;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::tenancy::{admin_of, member_of};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PdfListParams;
use crate::response::{deleted, ApiJson, ApiResponse, Created};
use crate::state::AppState;

/// GET /api/company/{id}/pdfs?category=
pub async fn list_pdfs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<DbId>,
    Query(params): Query<PdfListParams>,
) -> AppResult<ApiJson<Vec<Pdf>>> {
    member_of(&state, &auth, company_id).await?;
    if let Some(category) = params.category.as_deref() {
        validate_pdf_category(category)?;
    }

    let pdfs = state
        .store
        .list_pdfs(company_id, params.category.as_deref())
        .await?;
    Ok(ApiResponse::ok(pdfs))
}

/// POST /api/company/{id}/pdfs
///
/// Register a PDF. `category` defaults to `other`.
pub async fn create_pdf(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreatePdf>,
) -> AppResult<Created<Pdf>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    validate_not_blank("title", &input.title)?;
    validate_pdf_file_name(&input.file_name)?;

    let category = input
        .category
        .clone()
        .unwrap_or_else(|| PDF_CATEGORY_OTHER.to_string());
    validate_pdf_category(&category)?;

    let pdf = state
        .store
        .create_pdf(company_id, Some(auth.user_id), &input, &category)
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        company_id,
        pdf_id = pdf.id,
        category = %pdf.category,
        "PDF created"
    );
    Ok(ApiResponse::created("PDF created", pdf))
}

/// GET /api/company/{id}/pdfs/{pdf_id}
pub async fn get_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, pdf_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<Pdf>> {
    member_of(&state, &auth, company_id).await?;
    let pdf = fetch_pdf(&state, company_id, pdf_id).await?;
    Ok(ApiResponse::ok(pdf))
}

/// PUT /api/company/{id}/pdfs/{pdf_id}
pub async fn update_pdf(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, pdf_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdatePdf>,
) -> AppResult<ApiJson<Pdf>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    if let Some(title) = input.title.as_deref() {
        validate_not_blank("title", title)?;
    }
    if let Some(category) = input.category.as_deref() {
        validate_pdf_category(category)?;
    }
    if let Some(file_name) = input.file_name.as_deref() {
        validate_pdf_file_name(file_name)?;
    }
    fetch_pdf(&state, company_id, pdf_id).await?;

    let pdf = state
        .store
        .update_pdf(pdf_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Pdf",
            id: pdf_id,
        }))?;

    tracing::info!(user_id = auth.user_id, pdf_id, "PDF updated");
    Ok(ApiResponse::with_message("PDF updated", pdf))
}

/// DELETE /api/company/{id}/pdfs/{pdf_id}
pub async fn delete_pdf(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, pdf_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<()>> {
    admin_of(&state, &auth, company_id).await?;
    fetch_pdf(&state, company_id, pdf_id).await?;

    state.store.delete_pdf(pdf_id).await?;

    tracing::info!(user_id = auth.user_id, pdf_id, "PDF deleted");
    Ok(deleted("PDF deleted"))
}

async fn fetch_pdf(state: &AppState, company_id: DbId, pdf_id: DbId) -> AppResult<Pdf> {
    let pdf = state.store.find_pdf(pdf_id).await?;
    Ok(scoped(pdf, |p| p.company_id, company_id, "Pdf", pdf_id)?)
}
