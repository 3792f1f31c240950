//! Persistence for the trialsite platform.
//!
//! Handlers talk to an `Arc<dyn Store>`; two backends implement it:
//!
//! - [`PgStore`] -- Postgres via `sqlx`, one repository per table.
//! - [`JsonStore`] -- an in-process dataset, optionally persisted to a JSON file.

use sqlx::postgres::PgPoolOptions;

pub mod json_store;
pub mod models;
pub mod pg_store;
pub mod repositories;
pub mod store;

pub use json_store::JsonStore;
pub use pg_store::PgStore;
pub use store::{
    CompanyStore, EnrollmentStore, HospitalStore, NewsStore, PdfStore, ProtocolStore, StatsStore,
    Store, StoreError, StoreResult, TrainingStore, UserStore,
};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
