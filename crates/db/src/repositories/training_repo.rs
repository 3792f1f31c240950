//! Repository for the `training_materials` table.

use sqlx::PgPool;
use trialsite_core::types::DbId;

use crate::models::training::{CreateTrainingMaterial, TrainingMaterial, UpdateTrainingMaterial};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, title, description, material_type, url, \
                       duration_minutes, sort_order, is_required, deleted_at, created_at, updated_at";

/// Provides CRUD operations for training materials.
pub struct TrainingRepo;

impl TrainingRepo {
    /// Insert a training material, returning the created row.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateTrainingMaterial,
    ) -> Result<TrainingMaterial, sqlx::Error> {
        let query = format!(
            "INSERT INTO training_materials
                (company_id, title, description, material_type, url, duration_minutes,
                 sort_order, is_required)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), COALESCE($8, FALSE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrainingMaterial>(&query)
            .bind(company_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.material_type)
            .bind(&input.url)
            .bind(input.duration_minutes)
            .bind(input.sort_order)
            .bind(input.is_required)
            .fetch_one(pool)
            .await
    }

    /// Find a material by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TrainingMaterial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM training_materials WHERE id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, TrainingMaterial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a company's materials in display order.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<TrainingMaterial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM training_materials
             WHERE company_id = $1 AND deleted_at IS NULL
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, TrainingMaterial>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a material. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrainingMaterial,
    ) -> Result<Option<TrainingMaterial>, sqlx::Error> {
        let query = format!(
            "UPDATE training_materials SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                material_type = COALESCE($4, material_type),
                url = COALESCE($5, url),
                duration_minutes = COALESCE($6, duration_minutes),
                sort_order = COALESCE($7, sort_order),
                is_required = COALESCE($8, is_required)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrainingMaterial>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.material_type)
            .bind(&input.url)
            .bind(input.duration_minutes)
            .bind(input.sort_order)
            .bind(input.is_required)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a material. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE training_materials SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
