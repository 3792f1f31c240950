//! Tenant boundary rules.
//!
//! Every company-scoped request passes through [`check_member`] or
//! [`check_admin`] before touching the store. Super admins cross tenant
//! boundaries; everybody else is pinned to the company in their token.

use crate::error::CoreError;
use crate::roles::{ROLE_COMPANY_ADMIN, ROLE_SUPER_ADMIN};
use crate::types::DbId;

/// Allow the caller to read data belonging to `company_id`.
pub fn check_member(
    role: &str,
    own_company: Option<DbId>,
    company_id: DbId,
) -> Result<(), CoreError> {
    if role == ROLE_SUPER_ADMIN || own_company == Some(company_id) {
        return Ok(());
    }
    Err(CoreError::Forbidden(
        "You do not have access to this company".into(),
    ))
}

/// Allow the caller to modify data belonging to `company_id`.
pub fn check_admin(
    role: &str,
    own_company: Option<DbId>,
    company_id: DbId,
) -> Result<(), CoreError> {
    check_member(role, own_company, company_id)?;
    if role == ROLE_SUPER_ADMIN || role == ROLE_COMPANY_ADMIN {
        return Ok(());
    }
    Err(CoreError::Forbidden(
        "Company admin role required".into(),
    ))
}

/// Treat a record from another tenant as if it did not exist.
///
/// Returns the record when its `owner` matches the requested tenant.
pub fn scoped<T>(
    record: Option<T>,
    owner: impl Fn(&T) -> DbId,
    company_id: DbId,
    entity: &'static str,
    id: DbId,
) -> Result<T, CoreError> {
    match record {
        Some(r) if owner(&r) == company_id => Ok(r),
        _ => Err(CoreError::NotFound { entity, id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::ROLE_INVESTIGATOR;
    use assert_matches::assert_matches;

    #[test]
    fn super_admin_crosses_tenants() {
        assert!(check_member(ROLE_SUPER_ADMIN, None, 7).is_ok());
        assert!(check_admin(ROLE_SUPER_ADMIN, None, 7).is_ok());
    }

    #[test]
    fn members_pinned_to_own_company() {
        assert!(check_member(ROLE_INVESTIGATOR, Some(1), 1).is_ok());
        assert_matches!(
            check_member(ROLE_INVESTIGATOR, Some(1), 2),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            check_member(ROLE_COMPANY_ADMIN, None, 2),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn investigators_cannot_administer() {
        assert_matches!(
            check_admin(ROLE_INVESTIGATOR, Some(1), 1),
            Err(CoreError::Forbidden(_))
        );
        assert!(check_admin(ROLE_COMPANY_ADMIN, Some(1), 1).is_ok());
        assert!(check_admin(ROLE_COMPANY_ADMIN, Some(1), 2).is_err());
    }

    #[test]
    fn foreign_records_are_not_found() {
        let record = Some((5_i64, "news"));
        assert_matches!(
            scoped(record, |r| r.0, 6, "News", 10),
            Err(CoreError::NotFound { entity: "News", id: 10 })
        );
        assert_eq!(scoped(record, |r| r.0, 5, "News", 10).unwrap().1, "news");
        assert_matches!(
            scoped(None::<(i64, &str)>, |r| r.0, 5, "News", 10),
            Err(CoreError::NotFound { .. })
        );
    }
}
