//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires `company_admin` or `super_admin`.
//! - [`rbac::RequireSuperAdmin`] -- Requires `super_admin`.

pub mod auth;
pub mod rbac;
