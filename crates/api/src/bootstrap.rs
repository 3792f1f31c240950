//! First-run provisioning of the platform super admin.

use trialsite_core::error::CoreError;
use trialsite_core::roles::ROLE_SUPER_ADMIN;
use trialsite_core::validation::normalize_email;
use trialsite_db::models::user::CreateUser;
use trialsite_db::{Store, UserStore};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the super admin unless a user with that email already exists.
///
/// Returns `true` when a user was created. An existing account is left
/// untouched, including its password.
pub async fn ensure_super_admin(store: &dyn Store, admin: &BootstrapAdmin) -> AppResult<bool> {
    let email = normalize_email(&admin.email);

    if store.find_user_by_email(&email).await?.is_some() {
        tracing::debug!(%email, "Bootstrap admin already exists");
        return Ok(false);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = store
        .create_user(&CreateUser {
            company_id: None,
            hospital_id: None,
            email,
            first_name: "Platform".to_string(),
            last_name: "Admin".to_string(),
            role: ROLE_SUPER_ADMIN.to_string(),
            password_hash: Some(password_hash),
        })
        .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap super admin created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use trialsite_db::JsonStore;

    use super::*;

    fn admin(password: &str) -> BootstrapAdmin {
        BootstrapAdmin {
            email: "Root@Example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn creates_once() {
        let store = JsonStore::in_memory();
        assert!(ensure_super_admin(&store, &admin("long-enough-pw")).await.unwrap());
        assert!(!ensure_super_admin(&store, &admin("another-password")).await.unwrap());

        let user = store
            .find_user_by_email("root@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, ROLE_SUPER_ADMIN);
        assert_eq!(user.company_id, None);
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let store = JsonStore::in_memory();
        assert!(ensure_super_admin(&store, &admin("short")).await.is_err());
    }
}
