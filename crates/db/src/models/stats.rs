//! Per-company dashboard counters.

use serde::Serialize;
use sqlx::FromRow;
use trialsite_core::types::DbId;

/// Aggregate counts shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
pub struct CompanyStats {
    pub company_id: DbId,
    pub user_count: i64,
    pub investigator_count: i64,
    pub hospital_count: i64,
    pub active_hospital_count: i64,
    pub total_enrolled: i64,
    pub total_screened: i64,
    pub total_target: i64,
    pub enrollment_records: i64,
    pub published_news: i64,
    pub pdf_count: i64,
    pub training_count: i64,
    pub protocol_count: i64,
}
