//! Study protocol model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trialsite_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `study_protocols` table.
///
/// At most one live protocol per company has `is_current = true`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StudyProtocol {
    pub id: DbId,
    pub company_id: DbId,
    pub title: String,
    pub version: String,
    pub summary: Option<String>,
    pub document_url: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub is_current: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a protocol version.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStudyProtocol {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 32))]
    pub version: String,
    #[validate(length(max = 5000))]
    pub summary: Option<String>,
    #[validate(url)]
    pub document_url: Option<String>,
    pub effective_date: Option<NaiveDate>,
    /// Defaults to `false`. `true` demotes the company's other protocols.
    pub is_current: Option<bool>,
}

/// DTO for updating a protocol. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStudyProtocol {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub version: Option<String>,
    #[validate(length(max = 5000))]
    pub summary: Option<String>,
    #[validate(url)]
    pub document_url: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
}
