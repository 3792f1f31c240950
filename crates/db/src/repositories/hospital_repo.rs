//! Repository for the `hospitals` table.

use sqlx::PgPool;
use trialsite_core::types::DbId;

use crate::models::hospital::{CreateHospital, Hospital, UpdateHospital};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, company_id, name, city, country, principal_investigator, \
                       target_enrollment, enrolled_count, screened_count, is_active, \
                       deleted_at, created_at, updated_at";

/// Provides CRUD operations for hospitals.
pub struct HospitalRepo;

impl HospitalRepo {
    /// Insert a new hospital, returning the created row.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateHospital,
    ) -> Result<Hospital, sqlx::Error> {
        let query = format!(
            "INSERT INTO hospitals
                (company_id, name, city, country, principal_investigator,
                 target_enrollment, screened_count)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hospital>(&query)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.city)
            .bind(&input.country)
            .bind(&input.principal_investigator)
            .bind(input.target_enrollment)
            .bind(input.screened_count)
            .fetch_one(pool)
            .await
    }

    /// Find a hospital by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Hospital>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM hospitals WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Hospital>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the live hospitals of one company ordered by name.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<Hospital>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hospitals
             WHERE company_id = $1 AND deleted_at IS NULL
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Hospital>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a hospital. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHospital,
    ) -> Result<Option<Hospital>, sqlx::Error> {
        let query = format!(
            "UPDATE hospitals SET
                name = COALESCE($2, name),
                city = COALESCE($3, city),
                country = COALESCE($4, country),
                principal_investigator = COALESCE($5, principal_investigator),
                target_enrollment = COALESCE($6, target_enrollment),
                enrolled_count = COALESCE($7, enrolled_count),
                screened_count = COALESCE($8, screened_count),
                is_active = COALESCE($9, is_active)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hospital>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.city)
            .bind(&input.country)
            .bind(&input.principal_investigator)
            .bind(input.target_enrollment)
            .bind(input.enrolled_count)
            .bind(input.screened_count)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a hospital by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE hospitals SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
