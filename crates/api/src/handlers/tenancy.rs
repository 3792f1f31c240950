//! Tenant gates shared by every `/company/{id}/...` handler.
//!
//! The role check runs before the lookup so that a caller probing another
//! tenant learns nothing about whether it exists. Members of a deactivated
//! company are refused with 403, the same answer sign-in gives them.

use trialsite_core::error::CoreError;
use trialsite_core::types::DbId;
use trialsite_db::models::company::Company;
use trialsite_db::CompanyStore;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// The caller may read `company_id`, and the company is live.
pub async fn member_of(state: &AppState, auth: &AuthUser, company_id: DbId) -> AppResult<Company> {
    auth.ensure_member(company_id)?;
    live_company(state, auth, company_id).await
}

/// The caller may modify `company_id`, and the company is live.
pub async fn admin_of(state: &AppState, auth: &AuthUser, company_id: DbId) -> AppResult<Company> {
    auth.ensure_admin(company_id)?;
    live_company(state, auth, company_id).await
}

async fn live_company(state: &AppState, auth: &AuthUser, company_id: DbId) -> AppResult<Company> {
    let company = state
        .store
        .find_company(company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: company_id,
        }))?;

    // Super admins keep access so they can reactivate.
    if !company.is_active && !auth.is_super_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Company is inactive".into(),
        )));
    }
    Ok(company)
}
