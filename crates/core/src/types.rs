/// Primary keys are PostgreSQL BIGSERIAL (or sequential ids in the document store).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
