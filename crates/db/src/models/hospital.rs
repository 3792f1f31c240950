//! Hospital (enrollment site) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trialsite_core::types::{DbId, Timestamp};
use validator::Validate;

/// A hospital row from the `hospitals` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Hospital {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub principal_investigator: Option<String>,
    pub target_enrollment: Option<i32>,
    /// Aggregate counter, kept in step with the `enrollments` table.
    pub enrolled_count: i32,
    pub screened_count: i32,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new hospital.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateHospital {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    #[validate(length(max = 120))]
    pub country: Option<String>,
    #[validate(length(max = 200))]
    pub principal_investigator: Option<String>,
    #[validate(range(min = 0))]
    pub target_enrollment: Option<i32>,
    #[validate(range(min = 0))]
    pub screened_count: Option<i32>,
}

/// DTO for updating an existing hospital. All fields are optional.
///
/// `enrolled_count` may be corrected by an admin (e.g. after a data import);
/// normal enrollment goes through the enrollment endpoints.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateHospital {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    #[validate(length(max = 120))]
    pub country: Option<String>,
    #[validate(length(max = 200))]
    pub principal_investigator: Option<String>,
    #[validate(range(min = 0))]
    pub target_enrollment: Option<i32>,
    #[validate(range(min = 0))]
    pub enrolled_count: Option<i32>,
    #[validate(range(min = 0))]
    pub screened_count: Option<i32>,
    pub is_active: Option<bool>,
}
