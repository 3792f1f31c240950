//! Domain rules shared by the storage backends and the HTTP layer.
//!
//! Nothing in this crate performs I/O.

pub mod content;
pub mod error;
pub mod leaderboard;
pub mod pagination;
pub mod roles;
pub mod tenant;
pub mod types;
pub mod validation;
