//! Postgres repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. [`crate::PgStore`] adapts
//! them to the [`crate::Store`] traits.

pub mod company_repo;
pub mod enrollment_repo;
pub mod hospital_repo;
pub mod news_repo;
pub mod pdf_repo;
pub mod protocol_repo;
pub mod stats_repo;
pub mod training_repo;
pub mod user_repo;

pub use company_repo::CompanyRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use hospital_repo::HospitalRepo;
pub use news_repo::NewsRepo;
pub use pdf_repo::PdfRepo;
pub use protocol_repo::ProtocolRepo;
pub use stats_repo::StatsRepo;
pub use training_repo::TrainingRepo;
pub use user_repo::UserRepo;
