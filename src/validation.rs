//! Input validation and normalization for values headed to the table store.

use crate::error::{BoardError, Result};

fn invalid(msg: impl Into<String>) -> BoardError {
    BoardError::InvalidInput(msg.into())
}

/// Validation utilities for caller-supplied input.
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a user identifier (e-mail style).
    pub fn validate_identifier(id: &str) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(invalid("identifier cannot be empty"));
        }

        if id.len() > 254 {
            return Err(invalid("identifier too long (max 254 characters)"));
        }

        let parts: Vec<&str> = id.split('@').collect();
        if parts.len() != 2 {
            return Err(invalid("identifier must contain exactly one @ symbol"));
        }

        if parts[0].is_empty() || parts[0].len() > 64 {
            return Err(invalid("identifier local part invalid"));
        }

        if parts[1].is_empty() || !parts[1].contains('.') {
            return Err(invalid("identifier domain invalid"));
        }

        Ok(())
    }

    /// Validate a display name.
    pub fn validate_display_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(invalid("display name cannot be empty"));
        }

        if name.len() > 100 {
            return Err(invalid("display name too long (max 100 characters)"));
        }

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            return Err(invalid("display name contains invalid characters"));
        }

        Ok(())
    }

    /// Validate a contact number. Formatting characters are tolerated; the
    /// digit count is what matters.
    pub fn validate_contact_number(contact: &str) -> Result<()> {
        if contact.trim().is_empty() {
            return Err(invalid("contact number cannot be empty"));
        }

        let digits = normalize_contact(contact);
        if !(7..=15).contains(&digits.len()) {
            return Err(invalid("contact number must contain between 7 and 15 digits"));
        }

        Ok(())
    }

    /// Validate an action label before it is logged.
    pub fn validate_action_label(action: &str) -> Result<()> {
        if action.trim().is_empty() {
            return Err(invalid("action label cannot be empty"));
        }

        if action.len() > 200 {
            return Err(invalid("action label too long (max 200 characters)"));
        }

        if action.chars().any(|c| c.is_control()) {
            return Err(invalid("action label contains control characters"));
        }

        Ok(())
    }

    /// Validate a bulletin target identifier.
    pub fn validate_target(target: &str) -> Result<()> {
        if target.trim().is_empty() {
            return Err(invalid("target identifier cannot be empty"));
        }

        if target.len() > 100 {
            return Err(invalid("target identifier too long (max 100 characters)"));
        }

        Ok(())
    }
}

/// Normalize a user identifier: trimmed and lowercased.
#[must_use]
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Reduce a free-text contact number to its digits.
#[must_use]
pub fn normalize_contact(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
