//! Company (tenant) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trialsite_core::types::{DbId, Timestamp};
use validator::Validate;

/// A company row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// External registry id of the sponsored trial (e.g. an NCT number).
    pub clinical_trial_id: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Branding subset served to unauthenticated mobile clients.
#[derive(Debug, Clone, Serialize)]
pub struct PublicCompany {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
}

impl From<Company> for PublicCompany {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            logo_url: c.logo_url,
            primary_color: c.primary_color,
        }
    }
}

/// DTO for creating a new company.
///
/// `slug` is derived from `name` by the handler when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompany {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub slug: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub clinical_trial_id: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

/// DTO for updating an existing company. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCompany {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub clinical_trial_id: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub is_active: Option<bool>,
}
