//! Well-known role name constants.
//!
//! These must match the `chk_users_role` constraint in the `users` migration.

use crate::error::CoreError;

/// Platform operator; not bound to any company.
pub const ROLE_SUPER_ADMIN: &str = "super_admin";
/// Manages one company's users, sites and content.
pub const ROLE_COMPANY_ADMIN: &str = "company_admin";
/// Site participant; reads content and records enrollments.
pub const ROLE_INVESTIGATOR: &str = "investigator";

pub const ALL_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_COMPANY_ADMIN, ROLE_INVESTIGATOR];

/// Validate that a role name is one of the known roles.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if ALL_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown role '{role}'. Valid: {ALL_ROLES:?}"
        )))
    }
}

/// Whether the role may manage a company's records.
pub fn is_admin_role(role: &str) -> bool {
    role == ROLE_SUPER_ADMIN || role == ROLE_COMPANY_ADMIN
}
