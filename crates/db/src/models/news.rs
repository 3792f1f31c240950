//! News post entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trialsite_core::types::{DbId, Timestamp};
use validator::Validate;

/// A news row from the `news` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct News {
    pub id: DbId,
    pub company_id: DbId,
    pub author_id: Option<DbId>,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub is_published: bool,
    /// Stamped the first time the post is published; never cleared.
    pub published_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a news post.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNews {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 20000))]
    pub body: String,
    #[validate(url)]
    pub image_url: Option<String>,
    /// Defaults to `true`.
    pub is_published: Option<bool>,
}

/// DTO for updating a news post. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateNews {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub body: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}
