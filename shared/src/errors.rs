//! Error types for the FitControl domain crate

use thiserror::Error;

/// Errors raised while turning raw streak input into typed values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreakError {
    /// Date string that is not a valid `YYYY-MM-DD` calendar date
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown weekday: {0}")]
    InvalidWeekday(String),
}

/// Field-level validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_message_names_input() {
        let err = StreakError::InvalidDate("2024-13-01".to_string());
        assert!(err.to_string().contains("2024-13-01"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("email", "Invalid email format");
        assert_eq!(err.to_string(), "email: Invalid email format");
    }
}
