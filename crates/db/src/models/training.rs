//! Training material model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trialsite_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `training_materials` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TrainingMaterial {
    pub id: DbId,
    pub company_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub material_type: String,
    pub url: String,
    pub duration_minutes: Option<i32>,
    pub sort_order: i32,
    pub is_required: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a training material.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTrainingMaterial {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub material_type: String,
    #[validate(url)]
    pub url: String,
    #[validate(range(min = 0))]
    pub duration_minutes: Option<i32>,
    /// Defaults to 0.
    pub sort_order: Option<i32>,
    /// Defaults to `false`.
    pub is_required: Option<bool>,
}

/// DTO for updating a training material. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTrainingMaterial {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub material_type: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    #[validate(range(min = 0))]
    pub duration_minutes: Option<i32>,
    pub sort_order: Option<i32>,
    pub is_required: Option<bool>,
}
