//! User (investigator) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trialsite_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER return this from a handler directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    /// `None` only for platform super admins.
    pub company_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    /// Stored lowercase; see `trialsite_core::validation::normalize_email`.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    /// Investigators who only sign in with login codes have no password.
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub company_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub has_password: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            company_id: u.company_id,
            hospital_id: u.hospital_id,
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            role: u.role.clone(),
            is_active: u.is_active,
            has_password: u.password_hash.is_some(),
            last_login_at: u.last_login_at,
            created_at: u.created_at,
        }
    }
}

/// DTO for creating a new user. Built by handlers after hashing the password.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub company_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub password_hash: Option<String>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub hospital_id: Option<DbId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}
