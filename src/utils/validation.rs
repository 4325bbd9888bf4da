//! Input validation utilities
//!
//! Checks applied to configuration values and to identifiers before they are
//! interpolated into request paths.

use crate::error::UtilsError;

fn invalid(message: String) -> crate::AppError {
    UtilsError::Validation { message }.into()
}

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(invalid(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        )));
    }

    Ok(())
}

/// Validate an object identifier used as a path segment
pub fn validate_identifier(kind: &str, id: &str) -> crate::Result<()> {
    if id.trim().is_empty() {
        return Err(invalid(format!("{} ID cannot be empty", kind)));
    }

    if id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
        return Err(invalid(format!(
            "Invalid {} ID '{}': must not contain '/', '?', '#' or whitespace",
            kind, id
        )));
    }

    Ok(())
}

/// Validate that a required credential field is present
pub fn validate_required(field: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{} cannot be empty", field)));
    }
    Ok(())
}
