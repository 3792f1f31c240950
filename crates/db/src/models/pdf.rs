//! PDF metadata model and DTOs. File bytes live behind `file_url`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trialsite_core::types::{DbId, Timestamp};
use validator::Validate;

/// A PDF row from the `pdfs` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Pdf {
    pub id: DbId,
    pub company_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub file_name: String,
    pub file_url: String,
    pub size_bytes: Option<i64>,
    pub uploaded_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a PDF.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePdf {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Defaults to `"other"`.
    pub category: Option<String>,
    #[validate(length(min = 5, max = 255))]
    pub file_name: String,
    #[validate(url)]
    pub file_url: String,
    #[validate(range(min = 0))]
    pub size_bytes: Option<i64>,
}

/// DTO for updating PDF metadata. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePdf {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(length(min = 5, max = 255))]
    pub file_name: Option<String>,
    #[validate(url)]
    pub file_url: Option<String>,
    #[validate(range(min = 0))]
    pub size_bytes: Option<i64>,
}
