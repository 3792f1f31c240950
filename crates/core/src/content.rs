//! Content-library constants and validators (PDFs and training materials).

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// PDF categories (match `chk_pdfs_category`)
// ---------------------------------------------------------------------------

pub const PDF_CATEGORY_PROTOCOL: &str = "protocol";
pub const PDF_CATEGORY_CONSENT: &str = "consent";
pub const PDF_CATEGORY_MANUAL: &str = "manual";
pub const PDF_CATEGORY_NEWSLETTER: &str = "newsletter";
pub const PDF_CATEGORY_OTHER: &str = "other";

pub const VALID_PDF_CATEGORIES: &[&str] = &[
    PDF_CATEGORY_PROTOCOL,
    PDF_CATEGORY_CONSENT,
    PDF_CATEGORY_MANUAL,
    PDF_CATEGORY_NEWSLETTER,
    PDF_CATEGORY_OTHER,
];

// ---------------------------------------------------------------------------
// Training material types (match `chk_training_materials_type`)
// ---------------------------------------------------------------------------

pub const MATERIAL_TYPE_VIDEO: &str = "video";
pub const MATERIAL_TYPE_DOCUMENT: &str = "document";
pub const MATERIAL_TYPE_LINK: &str = "link";
pub const MATERIAL_TYPE_QUIZ: &str = "quiz";

pub const VALID_MATERIAL_TYPES: &[&str] = &[
    MATERIAL_TYPE_VIDEO,
    MATERIAL_TYPE_DOCUMENT,
    MATERIAL_TYPE_LINK,
    MATERIAL_TYPE_QUIZ,
];

/// Validate that a PDF category is in the known set.
pub fn validate_pdf_category(category: &str) -> Result<(), CoreError> {
    if VALID_PDF_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown PDF category '{category}'. Valid: {VALID_PDF_CATEGORIES:?}"
        )))
    }
}

/// Validate that a training material type is in the known set.
pub fn validate_material_type(material_type: &str) -> Result<(), CoreError> {
    if VALID_MATERIAL_TYPES.contains(&material_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown material type '{material_type}'. Valid: {VALID_MATERIAL_TYPES:?}"
        )))
    }
}

/// Validate that a file name looks like a PDF.
pub fn validate_pdf_file_name(file_name: &str) -> Result<(), CoreError> {
    if file_name.to_ascii_lowercase().ends_with(".pdf") && file_name.len() > 4 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "File name '{file_name}' must end with .pdf"
        )))
    }
}
