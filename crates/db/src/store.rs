//! Storage abstraction shared by every backend.
//!
//! One trait per aggregate, combined into [`Store`]. All traits are object
//! safe (via `async_trait`) so the HTTP layer can hold an `Arc<dyn Store>`
//! and stay ignorant of whether rows live in Postgres or a JSON file.
//!
//! Conventions shared by every implementation:
//!
//! - Soft-deleted rows are invisible to `find_*` and `list_*`.
//! - `update_*` applies only the `Some` fields and returns `None` when no
//!   live row matches.
//! - `delete_*` returns `false` when nothing was deleted.

use async_trait::async_trait;
use trialsite_core::types::{DbId, Timestamp};

use crate::models::company::{Company, CreateCompany, UpdateCompany};
use crate::models::enrollment::{CreateEnrollment, Enrollment};
use crate::models::hospital::{CreateHospital, Hospital, UpdateHospital};
use crate::models::news::{CreateNews, News, UpdateNews};
use crate::models::pdf::{CreatePdf, Pdf, UpdatePdf};
use crate::models::protocol::{CreateStudyProtocol, StudyProtocol, UpdateStudyProtocol};
use crate::models::stats::CompanyStats;
use crate::models::training::{CreateTrainingMaterial, TrainingMaterial, UpdateTrainingMaterial};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Errors raised by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Reading or writing the JSON data file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON data file could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A uniqueness rule was violated (document backend).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A referenced parent row does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Insert a company. `input.slug` must already be resolved.
    async fn create_company(&self, input: &CreateCompany, slug: &str) -> StoreResult<Company>;
    async fn find_company(&self, id: DbId) -> StoreResult<Option<Company>>;
    async fn find_company_by_slug(&self, slug: &str) -> StoreResult<Option<Company>>;
    /// All live companies, ordered by name.
    async fn list_companies(&self) -> StoreResult<Vec<Company>>;
    async fn update_company(
        &self,
        id: DbId,
        input: &UpdateCompany,
    ) -> StoreResult<Option<Company>>;
    async fn delete_company(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;
    /// Lookup by normalized (lowercase) email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Users of one company, ordered by last name then first name.
    async fn list_users(&self, company_id: DbId) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: DbId, input: &UpdateUser) -> StoreResult<Option<User>>;
    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool>;
    async fn record_login(&self, id: DbId) -> StoreResult<()>;
    /// Sets `is_active = false`. Returns `false` if already inactive or missing.
    async fn deactivate_user(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait HospitalStore: Send + Sync {
    async fn create_hospital(
        &self,
        company_id: DbId,
        input: &CreateHospital,
    ) -> StoreResult<Hospital>;
    async fn find_hospital(&self, id: DbId) -> StoreResult<Option<Hospital>>;
    /// Live hospitals of one company, ordered by name.
    async fn list_hospitals(&self, company_id: DbId) -> StoreResult<Vec<Hospital>>;
    async fn update_hospital(
        &self,
        id: DbId,
        input: &UpdateHospital,
    ) -> StoreResult<Option<Hospital>>;
    async fn delete_hospital(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Insert an enrollment and bump the hospital's `enrolled_count`, atomically.
    async fn record_enrollment(
        &self,
        company_id: DbId,
        hospital_id: DbId,
        investigator_id: Option<DbId>,
        input: &CreateEnrollment,
    ) -> StoreResult<Enrollment>;
    async fn find_enrollment(&self, id: DbId) -> StoreResult<Option<Enrollment>>;
    /// Newest first.
    async fn list_enrollments(
        &self,
        company_id: DbId,
        hospital_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Enrollment>>;
    /// `(hospital_id, enrolled_at)` of every enrollment in the company.
    async fn enrollment_dates(&self, company_id: DbId) -> StoreResult<Vec<(DbId, Timestamp)>>;
    /// Remove an enrollment and decrement the counter (floored at zero).
    async fn withdraw_enrollment(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn create_news(
        &self,
        company_id: DbId,
        author_id: Option<DbId>,
        input: &CreateNews,
    ) -> StoreResult<News>;
    async fn find_news(&self, id: DbId) -> StoreResult<Option<News>>;
    /// Newest first. Drafts are skipped unless `include_drafts`.
    async fn list_news(
        &self,
        company_id: DbId,
        include_drafts: bool,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<News>>;
    async fn update_news(&self, id: DbId, input: &UpdateNews) -> StoreResult<Option<News>>;
    async fn delete_news(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait PdfStore: Send + Sync {
    async fn create_pdf(
        &self,
        company_id: DbId,
        uploaded_by: Option<DbId>,
        input: &CreatePdf,
        category: &str,
    ) -> StoreResult<Pdf>;
    async fn find_pdf(&self, id: DbId) -> StoreResult<Option<Pdf>>;
    /// Newest first, optionally filtered by category.
    async fn list_pdfs(&self, company_id: DbId, category: Option<&str>) -> StoreResult<Vec<Pdf>>;
    async fn update_pdf(&self, id: DbId, input: &UpdatePdf) -> StoreResult<Option<Pdf>>;
    async fn delete_pdf(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait TrainingStore: Send + Sync {
    async fn create_training(
        &self,
        company_id: DbId,
        input: &CreateTrainingMaterial,
    ) -> StoreResult<TrainingMaterial>;
    async fn find_training(&self, id: DbId) -> StoreResult<Option<TrainingMaterial>>;
    /// Ordered by `sort_order`, then id.
    async fn list_training(&self, company_id: DbId) -> StoreResult<Vec<TrainingMaterial>>;
    async fn update_training(
        &self,
        id: DbId,
        input: &UpdateTrainingMaterial,
    ) -> StoreResult<Option<TrainingMaterial>>;
    async fn delete_training(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProtocolStore: Send + Sync {
    /// Insert a protocol; when it is current, demote the company's others.
    async fn create_protocol(
        &self,
        company_id: DbId,
        input: &CreateStudyProtocol,
    ) -> StoreResult<StudyProtocol>;
    async fn find_protocol(&self, id: DbId) -> StoreResult<Option<StudyProtocol>>;
    /// Newest first.
    async fn list_protocols(&self, company_id: DbId) -> StoreResult<Vec<StudyProtocol>>;
    async fn current_protocol(&self, company_id: DbId) -> StoreResult<Option<StudyProtocol>>;
    async fn update_protocol(
        &self,
        id: DbId,
        input: &UpdateStudyProtocol,
    ) -> StoreResult<Option<StudyProtocol>>;
    async fn delete_protocol(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn company_stats(&self, company_id: DbId) -> StoreResult<CompanyStats>;
    /// Cheap liveness probe for `/health`.
    async fn ping(&self) -> StoreResult<()>;
}

/// Everything the HTTP layer needs from a storage backend.
pub trait Store:
    CompanyStore
    + UserStore
    + HospitalStore
    + EnrollmentStore
    + NewsStore
    + PdfStore
    + TrainingStore
    + ProtocolStore
    + StatsStore
{
    /// Short backend name for logs and `/health`.
    fn backend_name(&self) -> &'static str;
}
