//! Dashboard aggregate queries.

use sqlx::PgPool;
use trialsite_core::roles::ROLE_INVESTIGATOR;
use trialsite_core::types::DbId;

use crate::models::stats::CompanyStats;

/// Read-only aggregate queries across a company's tables.
pub struct StatsRepo;

impl StatsRepo {
    /// Count users, sites, enrollments and content for one company.
    pub async fn company_stats(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<CompanyStats, sqlx::Error> {
        sqlx::query_as::<_, CompanyStats>(
            "SELECT
                $1::BIGINT AS company_id,
                (SELECT COUNT(*) FROM users WHERE company_id = $1) AS user_count,
                (SELECT COUNT(*) FROM users WHERE company_id = $1 AND role = $2)
                    AS investigator_count,
                (SELECT COUNT(*) FROM hospitals WHERE company_id = $1 AND deleted_at IS NULL)
                    AS hospital_count,
                (SELECT COUNT(*) FROM hospitals
                    WHERE company_id = $1 AND deleted_at IS NULL AND is_active)
                    AS active_hospital_count,
                (SELECT COALESCE(SUM(enrolled_count), 0)::BIGINT FROM hospitals
                    WHERE company_id = $1 AND deleted_at IS NULL) AS total_enrolled,
                (SELECT COALESCE(SUM(screened_count), 0)::BIGINT FROM hospitals
                    WHERE company_id = $1 AND deleted_at IS NULL) AS total_screened,
                (SELECT COALESCE(SUM(target_enrollment), 0)::BIGINT FROM hospitals
                    WHERE company_id = $1 AND deleted_at IS NULL) AS total_target,
                (SELECT COUNT(*) FROM enrollments WHERE company_id = $1) AS enrollment_records,
                (SELECT COUNT(*) FROM news
                    WHERE company_id = $1 AND deleted_at IS NULL AND is_published)
                    AS published_news,
                (SELECT COUNT(*) FROM pdfs WHERE company_id = $1 AND deleted_at IS NULL)
                    AS pdf_count,
                (SELECT COUNT(*) FROM training_materials
                    WHERE company_id = $1 AND deleted_at IS NULL) AS training_count,
                (SELECT COUNT(*) FROM study_protocols
                    WHERE company_id = $1 AND deleted_at IS NULL) AS protocol_count",
        )
        .bind(company_id)
        .bind(ROLE_INVESTIGATOR)
        .fetch_one(pool)
        .await
    }
}
