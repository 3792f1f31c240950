//! Field validators shared by every entity.
//!
//! Structural checks (lengths, email shape, URLs) are declared on the
//! request DTOs with `validator`; the rules here are the ones a derive
//! cannot express.

use crate::error::CoreError;

/// Minimum slug length.
pub const SLUG_MIN_LEN: usize = 2;
/// Maximum slug length.
pub const SLUG_MAX_LEN: usize = 64;

/// Derive a URL-safe slug from a display name.
///
/// Lowercases ASCII letters, keeps digits, collapses every other run of
/// characters into a single `-`, and trims dashes from both ends.
///
/// ```
/// use trialsite_core::validation::slugify;
///
/// assert_eq!(slugify("Acme Pharma, Inc."), "acme-pharma-inc");
/// assert_eq!(slugify("  --Oncology 2025--  "), "oncology-2025");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug.truncate(SLUG_MAX_LEN);
    slug.trim_end_matches('-').to_string()
}

/// Validate an explicit slug: `[a-z0-9-]`, no leading/trailing dash.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() < SLUG_MIN_LEN || slug.len() > SLUG_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be between {SLUG_MIN_LEN} and {SLUG_MAX_LEN} characters, got '{slug}'"
        )));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Only lowercase letters, digits and '-' are allowed"
        )));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Must not start or end with '-'"
        )));
    }

    Ok(())
}

/// Canonical form of an email address used for lookups and uniqueness.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate that a color string matches `#RRGGBB`.
pub fn validate_color_hex(color: &str) -> Result<(), CoreError> {
    if color.len() != 7 || !color.starts_with('#') {
        return Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Must be in #RRGGBB hex format"
        )));
    }

    if !color[1..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Must contain only hex digits after '#'"
        )));
    }

    Ok(())
}

/// Validate that an aggregate counter is non-negative.
pub fn validate_counter(field: &str, value: i32) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be >= 0, got {value}"
        )));
    }
    Ok(())
}

/// Reject strings that are empty once trimmed.
pub fn validate_not_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}
