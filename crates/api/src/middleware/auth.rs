//! JWT-based authentication extractor for Axum handlers.
//!
//! The token only proves identity. Role, tenant and the active flag are read
//! from the stored user on every request, so deactivation and role changes
//! apply to tokens already issued.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use trialsite_core::error::CoreError;
use trialsite_core::roles::{is_admin_role, ROLE_SUPER_ADMIN};
use trialsite_core::tenant;
use trialsite_core::types::DbId;
use trialsite_db::UserStore;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from the `Authorization: Bearer` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// Tenant of the stored user; `None` for super admins.
    pub company_id: Option<DbId>,
    pub role: String,
}

impl AuthUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == ROLE_SUPER_ADMIN
    }

    pub fn is_admin(&self) -> bool {
        is_admin_role(&self.role)
    }

    /// May this caller read `company_id`'s data?
    pub fn ensure_member(&self, company_id: DbId) -> Result<(), CoreError> {
        tenant::check_member(&self.role, self.company_id, company_id)
    }

    /// May this caller modify `company_id`'s data?
    pub fn ensure_admin(&self, company_id: DbId) -> Result<(), CoreError> {
        tenant::check_admin(&self.role, self.company_id, company_id)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = state
            .store
            .find_user(claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                tracing::info!(user_id = claims.sub, "Token rejected: user missing or inactive");
                AppError::Core(CoreError::Unauthorized("Account is no longer active".into()))
            })?;

        Ok(AuthUser {
            user_id: user.id,
            company_id: user.company_id,
            role: user.role,
        })
    }
}
