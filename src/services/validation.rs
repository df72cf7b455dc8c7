//! Field validation applied by the services before any persistence
//! access. Failures collect per-field messages into one client error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field_errors: HashMap<String, String>,
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Accumulates field errors across checks so a response can report them
/// all at once instead of failing on the first.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field is required");
        }
    }

    /// Format check only; call on emails that are present
    pub fn check_email(&mut self, field: &str, value: &str) {
        if !is_valid_email(value) {
            self.add(field, "Invalid email address");
        }
    }

    pub fn check_min_len(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.add(field, format!("Must be at least {} characters", min));
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                message: "Validation failed".to_string(),
                field_errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("jane.smith@email.com"));
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@domain"));
        assert!(!is_valid_email("spaces in@email.com"));
    }

    #[test]
    fn collects_all_field_errors() {
        let mut errors = FieldErrors::new();
        errors.require("name", "  ");
        errors.require("phone_number", "");
        errors.check_email("email", "bogus");

        let err = errors.finish().unwrap_err();
        assert_eq!(err.field_errors.len(), 3);
        assert_eq!(err.field_errors["name"], "This field is required");
    }

    #[test]
    fn empty_set_passes() {
        let mut errors = FieldErrors::new();
        errors.require("name", "Jane Smith");
        assert!(errors.finish().is_ok());
    }
}
