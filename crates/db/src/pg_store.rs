//! Postgres-backed [`Store`] that delegates to the repository layer.

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
use crate::repositories::{
    CompanyRepo, EnrollmentRepo, HospitalRepo, NewsRepo, PdfRepo, ProtocolRepo, StatsRepo,
    TrainingRepo, UserRepo,
};
use crate::store::{
    CompanyStore, EnrollmentStore, HospitalStore, NewsStore, PdfStore, ProtocolStore, StatsStore,
    Store, StoreError, StoreResult, TrainingStore, UserStore,
};
use crate::DbPool;

/// [`Store`] over a shared `sqlx` connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn create_company(&self, input: &CreateCompany, slug: &str) -> StoreResult<Company> {
        Ok(CompanyRepo::create(&self.pool, input, slug).await?)
    }

    async fn find_company(&self, id: DbId) -> StoreResult<Option<Company>> {
        Ok(CompanyRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_company_by_slug(&self, slug: &str) -> StoreResult<Option<Company>> {
        Ok(CompanyRepo::find_by_slug(&self.pool, slug).await?)
    }

    async fn list_companies(&self) -> StoreResult<Vec<Company>> {
        Ok(CompanyRepo::list(&self.pool).await?)
    }

    async fn update_company(
        &self,
        id: DbId,
        input: &UpdateCompany,
    ) -> StoreResult<Option<Company>> {
        Ok(CompanyRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_company(&self, id: DbId) -> StoreResult<bool> {
        Ok(CompanyRepo::soft_delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn list_users(&self, company_id: DbId) -> StoreResult<Vec<User>> {
        Ok(UserRepo::list_by_company(&self.pool, company_id).await?)
    }

    async fn update_user(&self, id: DbId, input: &UpdateUser) -> StoreResult<Option<User>> {
        Ok(UserRepo::update(&self.pool, id, input).await?)
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool> {
        Ok(UserRepo::update_password(&self.pool, id, password_hash).await?)
    }

    async fn record_login(&self, id: DbId) -> StoreResult<()> {
        Ok(UserRepo::record_login(&self.pool, id).await?)
    }

    async fn deactivate_user(&self, id: DbId) -> StoreResult<bool> {
        Ok(UserRepo::deactivate(&self.pool, id).await?)
    }
}

#[async_trait]
impl HospitalStore for PgStore {
    async fn create_hospital(
        &self,
        company_id: DbId,
        input: &CreateHospital,
    ) -> StoreResult<Hospital> {
        Ok(HospitalRepo::create(&self.pool, company_id, input).await?)
    }

    async fn find_hospital(&self, id: DbId) -> StoreResult<Option<Hospital>> {
        Ok(HospitalRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_hospitals(&self, company_id: DbId) -> StoreResult<Vec<Hospital>> {
        Ok(HospitalRepo::list_by_company(&self.pool, company_id).await?)
    }

    async fn update_hospital(
        &self,
        id: DbId,
        input: &UpdateHospital,
    ) -> StoreResult<Option<Hospital>> {
        Ok(HospitalRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_hospital(&self, id: DbId) -> StoreResult<bool> {
        Ok(HospitalRepo::soft_delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl EnrollmentStore for PgStore {
    async fn record_enrollment(
        &self,
        company_id: DbId,
        hospital_id: DbId,
        investigator_id: Option<DbId>,
        input: &CreateEnrollment,
    ) -> StoreResult<Enrollment> {
        EnrollmentRepo::record(&self.pool, company_id, hospital_id, investigator_id, input)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => StoreError::NotFound {
                    entity: "Hospital",
                    id: hospital_id,
                },
                other => StoreError::Database(other),
            })
    }

    async fn find_enrollment(&self, id: DbId) -> StoreResult<Option<Enrollment>> {
        Ok(EnrollmentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_enrollments(
        &self,
        company_id: DbId,
        hospital_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Enrollment>> {
        Ok(EnrollmentRepo::list(&self.pool, company_id, hospital_id, limit, offset).await?)
    }

    async fn enrollment_dates(&self, company_id: DbId) -> StoreResult<Vec<(DbId, Timestamp)>> {
        Ok(EnrollmentRepo::dates(&self.pool, company_id).await?)
    }

    async fn withdraw_enrollment(&self, id: DbId) -> StoreResult<bool> {
        Ok(EnrollmentRepo::withdraw(&self.pool, id).await?)
    }
}

#[async_trait]
impl NewsStore for PgStore {
    async fn create_news(
        &self,
        company_id: DbId,
        author_id: Option<DbId>,
        input: &CreateNews,
    ) -> StoreResult<News> {
        Ok(NewsRepo::create(&self.pool, company_id, author_id, input).await?)
    }

    async fn find_news(&self, id: DbId) -> StoreResult<Option<News>> {
        Ok(NewsRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_news(
        &self,
        company_id: DbId,
        include_drafts: bool,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<News>> {
        Ok(NewsRepo::list_by_company(&self.pool, company_id, include_drafts, limit, offset).await?)
    }

    async fn update_news(&self, id: DbId, input: &UpdateNews) -> StoreResult<Option<News>> {
        Ok(NewsRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_news(&self, id: DbId) -> StoreResult<bool> {
        Ok(NewsRepo::soft_delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl PdfStore for PgStore {
    async fn create_pdf(
        &self,
        company_id: DbId,
        uploaded_by: Option<DbId>,
        input: &CreatePdf,
        category: &str,
    ) -> StoreResult<Pdf> {
        Ok(PdfRepo::create(&self.pool, company_id, uploaded_by, input, category).await?)
    }

    async fn find_pdf(&self, id: DbId) -> StoreResult<Option<Pdf>> {
        Ok(PdfRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_pdfs(&self, company_id: DbId, category: Option<&str>) -> StoreResult<Vec<Pdf>> {
        Ok(PdfRepo::list_by_company(&self.pool, company_id, category).await?)
    }

    async fn update_pdf(&self, id: DbId, input: &UpdatePdf) -> StoreResult<Option<Pdf>> {
        Ok(PdfRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_pdf(&self, id: DbId) -> StoreResult<bool> {
        Ok(PdfRepo::soft_delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl TrainingStore for PgStore {
    async fn create_training(
        &self,
        company_id: DbId,
        input: &CreateTrainingMaterial,
    ) -> StoreResult<TrainingMaterial> {
        Ok(TrainingRepo::create(&self.pool, company_id, input).await?)
    }

    async fn find_training(&self, id: DbId) -> StoreResult<Option<TrainingMaterial>> {
        Ok(TrainingRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_training(&self, company_id: DbId) -> StoreResult<Vec<TrainingMaterial>> {
        Ok(TrainingRepo::list_by_company(&self.pool, company_id).await?)
    }

    async fn update_training(
        &self,
        id: DbId,
        input: &UpdateTrainingMaterial,
    ) -> StoreResult<Option<TrainingMaterial>> {
        Ok(TrainingRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_training(&self, id: DbId) -> StoreResult<bool> {
        Ok(TrainingRepo::soft_delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl ProtocolStore for PgStore {
    async fn create_protocol(
        &self,
        company_id: DbId,
        input: &CreateStudyProtocol,
    ) -> StoreResult<StudyProtocol> {
        Ok(ProtocolRepo::create(&self.pool, company_id, input).await?)
    }

    async fn find_protocol(&self, id: DbId) -> StoreResult<Option<StudyProtocol>> {
        Ok(ProtocolRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_protocols(&self, company_id: DbId) -> StoreResult<Vec<StudyProtocol>> {
        Ok(ProtocolRepo::list_by_company(&self.pool, company_id).await?)
    }

    async fn current_protocol(&self, company_id: DbId) -> StoreResult<Option<StudyProtocol>> {
        Ok(ProtocolRepo::find_current(&self.pool, company_id).await?)
    }

    async fn update_protocol(
        &self,
        id: DbId,
        input: &UpdateStudyProtocol,
    ) -> StoreResult<Option<StudyProtocol>> {
        Ok(ProtocolRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_protocol(&self, id: DbId) -> StoreResult<bool> {
        Ok(ProtocolRepo::soft_delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl StatsStore for PgStore {
    async fn company_stats(&self, company_id: DbId) -> StoreResult<CompanyStats> {
        Ok(StatsRepo::company_stats(&self.pool, company_id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
