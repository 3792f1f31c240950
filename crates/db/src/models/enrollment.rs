//! Enrollment record model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trialsite_core::types::{DbId, Timestamp};
use validator::Validate;

/// One enrolled subject, from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: DbId,
    pub company_id: DbId,
    pub hospital_id: DbId,
    pub investigator_id: Option<DbId>,
    /// Pseudonymous subject identifier, unique within a company.
    pub subject_code: String,
    pub notes: Option<String>,
    pub enrolled_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for recording an enrollment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEnrollment {
    #[validate(length(min = 1, max = 64))]
    pub subject_code: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    /// Defaults to now.
    pub enrolled_at: Option<Timestamp>,
}
