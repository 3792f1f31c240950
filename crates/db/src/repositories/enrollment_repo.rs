//! Repository for the `enrollments` table.
//!
//! Every write also adjusts `hospitals.enrolled_count` inside the same
//! transaction so the counter and the records never drift apart.

use sqlx::PgPool;
use trialsite_core::types::{DbId, Timestamp};

use crate::models::enrollment::{CreateEnrollment, Enrollment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, company_id, hospital_id, investigator_id, subject_code, notes, enrolled_at, created_at";

/// Provides record/withdraw operations for enrollments.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Insert an enrollment and increment the hospital counter.
    ///
    /// Fails with [`sqlx::Error::RowNotFound`] when the hospital does not
    /// exist in `company_id` (or is soft-deleted).
    pub async fn record(
        pool: &PgPool,
        company_id: DbId,
        hospital_id: DbId,
        investigator_id: Option<DbId>,
        input: &CreateEnrollment,
    ) -> Result<Enrollment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Row lock serializes concurrent enrollments at the same site.
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM hospitals
             WHERE id = $1 AND company_id = $2 AND deleted_at IS NULL
             FOR UPDATE",
        )
        .bind(hospital_id)
        .bind(company_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

        let insert_query = format!(
            "INSERT INTO enrollments
                (company_id, hospital_id, investigator_id, subject_code, notes, enrolled_at)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
             RETURNING {COLUMNS}"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&insert_query)
            .bind(company_id)
            .bind(hospital_id)
            .bind(investigator_id)
            .bind(&input.subject_code)
            .bind(&input.notes)
            .bind(input.enrolled_at)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE hospitals SET enrolled_count = enrolled_count + 1 WHERE id = $1")
            .bind(hospital_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(enrollment)
    }

    /// Find an enrollment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List enrollments newest first, optionally for one hospital.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        hospital_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments
             WHERE company_id = $1 AND ($2::BIGINT IS NULL OR hospital_id = $2)
             ORDER BY enrolled_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(company_id)
            .bind(hospital_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// `(hospital_id, enrolled_at)` pairs for windowed leaderboards.
    pub async fn dates(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<(DbId, Timestamp)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, Timestamp)>(
            "SELECT hospital_id, enrolled_at FROM enrollments WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    /// Delete an enrollment and decrement its hospital counter (never below zero).
    ///
    /// Returns `true` if a row was removed.
    pub async fn withdraw(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let hospital_id = sqlx::query_scalar::<_, DbId>(
            "DELETE FROM enrollments WHERE id = $1 RETURNING hospital_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(hospital_id) = hospital_id else {
            return Ok(false);
        };

        sqlx::query(
            "UPDATE hospitals SET enrolled_count = GREATEST(enrolled_count - 1, 0) WHERE id = $1",
        )
        .bind(hospital_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
