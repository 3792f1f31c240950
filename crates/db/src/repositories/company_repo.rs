//! Repository for the `companies` table.

use sqlx::PgPool;
use trialsite_core::types::DbId;

use crate::models::company::{Company, CreateCompany, UpdateCompany};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, description, clinical_trial_id, logo_url, \
                       primary_color, contact_email, is_active, deleted_at, created_at, updated_at";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCompany,
        slug: &str,
    ) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies
                (name, slug, description, clinical_trial_id, logo_url, primary_color, contact_email)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(&input.clinical_trial_id)
            .bind(&input.logo_url)
            .bind(&input.primary_color)
            .bind(&input.contact_email)
            .fetch_one(pool)
            .await
    }

    /// Find a company by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM companies WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a company by slug. Excludes soft-deleted rows.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Company>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM companies WHERE slug = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Company>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all live companies ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies WHERE deleted_at IS NULL ORDER BY name, id"
        );
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    /// Update a company. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                clinical_trial_id = COALESCE($4, clinical_trial_id),
                logo_url = COALESCE($5, logo_url),
                primary_color = COALESCE($6, primary_color),
                contact_email = COALESCE($7, contact_email),
                is_active = COALESCE($8, is_active)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.clinical_trial_id)
            .bind(&input.logo_url)
            .bind(&input.primary_color)
            .bind(&input.contact_email)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a company by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE companies SET deleted_at = NOW(), is_active = FALSE
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
