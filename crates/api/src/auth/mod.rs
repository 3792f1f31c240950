//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`login_code`] -- one-time numeric codes for passwordless mobile login.

pub mod jwt;
pub mod login_code;
pub mod password;
