//! Shared query parameter types for API handlers.

use serde::Deserialize;
use trialsite_core::types::{DbId, Timestamp};

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /company/{id}/leaderboard?limit=&since=`.
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<i64>,
    /// Count only enrollments at or after this instant (RFC 3339).
    pub since: Option<Timestamp>,
}

/// `GET /company/{id}/enrollments?hospital_id=&limit=&offset=`.
#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentListParams {
    pub hospital_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /company/{id}/news?include_drafts=&limit=&offset=`.
#[derive(Debug, Default, Deserialize)]
pub struct NewsListParams {
    /// Honoured for admins only.
    #[serde(default)]
    pub include_drafts: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /company/{id}/pdfs?category=`.
#[derive(Debug, Default, Deserialize)]
pub struct PdfListParams {
    pub category: Option<String>,
}
