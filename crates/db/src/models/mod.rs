//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//!   (also `Deserialize`, since the document backend stores rows as JSON)
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod company;
pub mod enrollment;
pub mod hospital;
pub mod news;
pub mod pdf;
pub mod protocol;
pub mod stats;
pub mod training;
pub mod user;
