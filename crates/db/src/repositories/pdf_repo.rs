//! Repository for the `pdfs` table.

use sqlx::PgPool;
use trialsite_core::types::DbId;

use crate::models::pdf::{CreatePdf, Pdf, UpdatePdf};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, title, description, category, file_name, file_url, \
                       size_bytes, uploaded_by, deleted_at, created_at, updated_at";

/// Provides CRUD operations for PDF metadata.
pub struct PdfRepo;

impl PdfRepo {
    /// Insert PDF metadata, returning the created row.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        uploaded_by: Option<DbId>,
        input: &CreatePdf,
        category: &str,
    ) -> Result<Pdf, sqlx::Error> {
        let query = format!(
            "INSERT INTO pdfs
                (company_id, title, description, category, file_name, file_url, size_bytes, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Pdf>(&query)
            .bind(company_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(category)
            .bind(&input.file_name)
            .bind(&input.file_url)
            .bind(input.size_bytes)
            .bind(uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a PDF by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Pdf>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pdfs WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Pdf>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List PDFs newest first, optionally filtered by category.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
        category: Option<&str>,
    ) -> Result<Vec<Pdf>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pdfs
             WHERE company_id = $1 AND deleted_at IS NULL
               AND ($2::TEXT IS NULL OR category = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Pdf>(&query)
            .bind(company_id)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Update PDF metadata. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePdf,
    ) -> Result<Option<Pdf>, sqlx::Error> {
        let query = format!(
            "UPDATE pdfs SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                file_name = COALESCE($5, file_name),
                file_url = COALESCE($6, file_url),
                size_bytes = COALESCE($7, size_bytes)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Pdf>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.file_name)
            .bind(&input.file_url)
            .bind(input.size_bytes)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a PDF. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE pdfs SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
