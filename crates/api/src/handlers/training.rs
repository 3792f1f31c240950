//! Handlers for training materials.

use axum::extract::{Path, State};
use axum::Json;
use trialsite_core::content::validate_material_type;
use trialsite_core::error::CoreError;
use trialsite_core::tenant::scoped;
use trialsite_core::types::DbId;
use trialsite_core::validation::validate_not_blank;
use trialsite_db::models::training::{
    CreateTrainingMaterial, TrainingMaterial, UpdateTrainingMaterial,
};
use trialsite_db::TrainingStore;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::tenancy::{admin_of, member_of};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{deleted, ApiJson, ApiResponse, Created};
use crate::state::AppState;

/// GET /api/company/{id}/training
///
/// Materials in display order (`sort_order`, then id).
pub async fn list_training(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<DbId>,
) -> AppResult<ApiJson<Vec<TrainingMaterial>>> {
    member_of(&state, &auth, company_id).await?;
    let materials = state.store.list_training(company_id).await?;
    Ok(ApiResponse::ok(materials))
}

/// POST /api/company/{id}/training
pub async fn create_training(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateTrainingMaterial>,
) -> AppResult<Created<TrainingMaterial>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    validate_not_blank("title", &input.title)?;
    validate_material_type(&input.material_type)?;

    let material = state.store.create_training(company_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        company_id,
        material_id = material.id,
        "Training material created"
    );
    Ok(ApiResponse::created("Training material created", material))
}

/// GET /api/company/{id}/training/{material_id}
pub async fn get_training(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, material_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<TrainingMaterial>> {
    member_of(&state, &auth, company_id).await?;
    let material = fetch_training(&state, company_id, material_id).await?;
    Ok(ApiResponse::ok(material))
}

/// PUT /api/company/{id}/training/{material_id}
pub async fn update_training(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, material_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTrainingMaterial>,
) -> AppResult<ApiJson<TrainingMaterial>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    if let Some(title) = input.title.as_deref() {
        validate_not_blank("title", title)?;
    }
    if let Some(material_type) = input.material_type.as_deref() {
        validate_material_type(material_type)?;
    }
    fetch_training(&state, company_id, material_id).await?;

    let material = state
        .store
        .update_training(material_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TrainingMaterial",
            id: material_id,
        }))?;

    tracing::info!(user_id = auth.user_id, material_id, "Training material updated");
    Ok(ApiResponse::with_message("Training material updated", material))
}

/// DELETE /api/company/{id}/training/{material_id}
pub async fn delete_training(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, material_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<()>> {
    admin_of(&state, &auth, company_id).await?;
    fetch_training(&state, company_id, material_id).await?;

    state.store.delete_training(material_id).await?;

    tracing::info!(user_id = auth.user_id, material_id, "Training material deleted");
    Ok(deleted("Training material deleted"))
}

async fn fetch_training(
    state: &AppState,
    company_id: DbId,
    material_id: DbId,
) -> AppResult<TrainingMaterial> {
    let material = state.store.find_training(material_id).await?;
    Ok(scoped(
        material,
        |m| m.company_id,
        company_id,
        "TrainingMaterial",
        material_id,
    )?)
}
