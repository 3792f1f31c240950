//! Handlers for study protocols.
//!
//! At most one protocol per company is current; marking another one
//! current demotes the previous one in the same storage operation.

use axum::extract::{Path, State};
use axum::Json;
use trialsite_core::error::CoreError;
use trialsite_core::tenant::scoped;
use trialsite_core::types::DbId;
use trialsite_core::validation::validate_not_blank;
use trialsite_db::models::protocol::{CreateStudyProtocol, StudyProtocol, UpdateStudyProtocol};
use trialsite_db::ProtocolStore;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::tenancy::{admin_of, member_of};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{deleted, ApiJson, ApiResponse, Created};
use crate::state::AppState;

/// GET /api/company/{id}/protocols
pub async fn list_protocols(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<DbId>,
) -> AppResult<ApiJson<Vec<StudyProtocol>>> {
    member_of(&state, &auth, company_id).await?;
    let protocols = state.store.list_protocols(company_id).await?;
    Ok(ApiResponse::ok(protocols))
}

/// GET /api/company/{id}/protocols/current
///
/// `data` is `null` when no protocol is current.
pub async fn current_protocol(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<DbId>,
) -> AppResult<ApiJson<Option<StudyProtocol>>> {
    member_of(&state, &auth, company_id).await?;
    let protocol = state.store.current_protocol(company_id).await?;
    Ok(ApiResponse::ok(protocol))
}

/// POST /api/company/{id}/protocols
pub async fn create_protocol(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(company_id): Path<DbId>,
    Json(input): Json<CreateStudyProtocol>,
) -> AppResult<Created<StudyProtocol>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    validate_not_blank("title", &input.title)?;
    validate_not_blank("version", &input.version)?;

    let protocol = state.store.create_protocol(company_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        company_id,
        protocol_id = protocol.id,
        version = %protocol.version,
        is_current = protocol.is_current,
        "Protocol created"
    );
    Ok(ApiResponse::created("Protocol created", protocol))
}

/// GET /api/company/{id}/protocols/{protocol_id}
pub async fn get_protocol(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, protocol_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<StudyProtocol>> {
    member_of(&state, &auth, company_id).await?;
    let protocol = fetch_protocol(&state, company_id, protocol_id).await?;
    Ok(ApiResponse::ok(protocol))
}

/// PUT /api/company/{id}/protocols/{protocol_id}
pub async fn update_protocol(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, protocol_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateStudyProtocol>,
) -> AppResult<ApiJson<StudyProtocol>> {
    admin_of(&state, &auth, company_id).await?;
    input.validate()?;
    if let Some(title) = input.title.as_deref() {
        validate_not_blank("title", title)?;
    }
    if let Some(version) = input.version.as_deref() {
        validate_not_blank("version", version)?;
    }
    fetch_protocol(&state, company_id, protocol_id).await?;

    let protocol = state
        .store
        .update_protocol(protocol_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StudyProtocol",
            id: protocol_id,
        }))?;

    tracing::info!(
        user_id = auth.user_id,
        protocol_id,
        is_current = protocol.is_current,
        "Protocol updated"
    );
    Ok(ApiResponse::with_message("Protocol updated", protocol))
}

/// DELETE /api/company/{id}/protocols/{protocol_id}
pub async fn delete_protocol(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path((company_id, protocol_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<()>> {
    admin_of(&state, &auth, company_id).await?;
    fetch_protocol(&state, company_id, protocol_id).await?;

    state.store.delete_protocol(protocol_id).await?;

    tracing::info!(user_id = auth.user_id, protocol_id, "Protocol deleted");
    Ok(deleted("Protocol deleted"))
}

async fn fetch_protocol(
    state: &AppState,
    company_id: DbId,
    protocol_id: DbId,
) -> AppResult<StudyProtocol> {
    let protocol = state.store.find_protocol(protocol_id).await?;
    Ok(scoped(
        protocol,
        |p| p.company_id,
        company_id,
        "StudyProtocol",
        protocol_id,
    )?)
}
