//! Repository for the `study_protocols` table.
//!
//! Marking a protocol current demotes the company's other protocols in the
//! same transaction; `uq_study_protocols_current` backs this up.

use sqlx::PgPool;
use trialsite_core::types::DbId;

use crate::models::protocol::{CreateStudyProtocol, StudyProtocol, UpdateStudyProtocol};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, title, version, summary, document_url, effective_date, \
                       is_current, deleted_at, created_at, updated_at";

/// Provides CRUD operations for study protocols.
pub struct ProtocolRepo;

impl ProtocolRepo {
    /// Insert a protocol, demoting the current one first when needed.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateStudyProtocol,
    ) -> Result<StudyProtocol, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if input.is_current == Some(true) {
            sqlx::query(
                "UPDATE study_protocols SET is_current = FALSE
                 WHERE company_id = $1 AND is_current",
            )
            .bind(company_id)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "INSERT INTO study_protocols
                (company_id, title, version, summary, document_url, effective_date, is_current)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, FALSE))
             RETURNING {COLUMNS}"
        );
        let protocol = sqlx::query_as::<_, StudyProtocol>(&query)
            .bind(company_id)
            .bind(&input.title)
            .bind(&input.version)
            .bind(&input.summary)
            .bind(&input.document_url)
            .bind(input.effective_date)
            .bind(input.is_current)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(protocol)
    }

    /// Find a protocol by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StudyProtocol>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM study_protocols WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, StudyProtocol>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a company's protocols newest first.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<StudyProtocol>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM study_protocols
             WHERE company_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, StudyProtocol>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// The company's current protocol, if one is marked.
    pub async fn find_current(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Option<StudyProtocol>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM study_protocols
             WHERE company_id = $1 AND is_current AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, StudyProtocol>(&query)
            .bind(company_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a protocol. Setting `is_current = true` demotes the others.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStudyProtocol,
    ) -> Result<Option<StudyProtocol>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let company_id = sqlx::query_scalar::<_, DbId>(
            "SELECT company_id FROM study_protocols
             WHERE id = $1 AND deleted_at IS NULL
             FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(company_id) = company_id else {
            return Ok(None);
        };

        if input.is_current == Some(true) {
            sqlx::query(
                "UPDATE study_protocols SET is_current = FALSE
                 WHERE company_id = $1 AND id <> $2 AND is_current",
            )
            .bind(company_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "UPDATE study_protocols SET
                title = COALESCE($2, title),
                version = COALESCE($3, version),
                summary = COALESCE($4, summary),
                document_url = COALESCE($5, document_url),
                effective_date = COALESCE($6, effective_date),
                is_current = COALESCE($7, is_current)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let protocol = sqlx::query_as::<_, StudyProtocol>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.version)
            .bind(&input.summary)
            .bind(&input.document_url)
            .bind(input.effective_date)
            .bind(input.is_current)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(protocol)
    }

    /// Soft-delete a protocol. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE study_protocols SET deleted_at = NOW(), is_current = FALSE
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
