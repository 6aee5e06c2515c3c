//! Input validation functions
//!
//! Each check returns `Result<(), String>` with a user-facing message; callers
//! attach the field name through [`crate::errors::ValidationError`].

use crate::errors::ValidationError;
use std::sync::OnceLock;

pub const MAX_DISPLAY_NAME_CHARS: usize = 50;
pub const MAX_FOOD_NAME_CHARS: usize = 100;
pub const MAX_ROUTINE_NAME_CHARS: usize = 100;

fn email_regex() -> Option<&'static regex_lite::Regex> {
    static EMAIL: OnceLock<Option<regex_lite::Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    match email_regex() {
        Some(re) if re.is_match(email) => Ok(()),
        _ => Err("Invalid email format".to_string()),
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

fn validate_name(value: &str, what: &str, max_chars: usize) -> Result<(), String> {
    let chars = value.trim().chars().count();
    if chars == 0 {
        return Err(format!("{} cannot be empty", what));
    }
    if chars > max_chars {
        return Err(format!("{} must be at most {} characters", what, max_chars));
    }
    Ok(())
}

/// Validate a display name (1-50 characters after trimming)
pub fn validate_display_name(name: &str) -> Result<(), String> {
    validate_name(name, "Display name", MAX_DISPLAY_NAME_CHARS)
}

pub fn validate_routine_name(name: &str) -> Result<(), String> {
    validate_name(name, "Routine name", MAX_ROUTINE_NAME_CHARS)
}

pub fn validate_food_name(name: &str) -> Result<(), String> {
    validate_name(name, "Food name", MAX_FOOD_NAME_CHARS)
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate calorie value
pub fn validate_calories(calories: f64) -> Result<(), String> {
    if calories.is_nan() || calories.is_infinite() {
        return Err("Calories must be a valid number".to_string());
    }
    if calories < 0.0 {
        return Err("Calories cannot be negative".to_string());
    }
    if calories > 50000.0 {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

/// Validate grams or a macronutrient amount
pub fn validate_non_negative(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Must be a valid number".to_string());
    }
    if value < 0.0 {
        return Err("Cannot be negative".to_string());
    }
    Ok(())
}

pub fn validate_sets(sets: i32) -> Result<(), String> {
    if !(1..=100).contains(&sets) {
        return Err("Sets must be between 1 and 100".to_string());
    }
    Ok(())
}

pub fn validate_reps(reps: i32) -> Result<(), String> {
    if !(1..=1000).contains(&reps) {
        return Err("Reps must be between 1 and 1000".to_string());
    }
    Ok(())
}

/// Validate an exercise load (in kg); bodyweight exercises use 0
pub fn validate_load(load_kg: f64) -> Result<(), String> {
    validate_non_negative(load_kg).map_err(|_| "Load must be zero or positive".to_string())
}

/// Attach a field name to a validation result
pub fn field(name: &str, result: Result<(), String>) -> Result<(), ValidationError> {
    result.map_err(|message| ValidationError::new(name, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("test@example.com", true)]
    #[case("user.name@domain.co.uk", true)]
    #[case("", false)]
    #[case("invalid", false)]
    #[case("no@dot", false)]
    #[case("spaces in@email.com", false)]
    fn test_validate_email(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(validate_email(email).is_ok(), valid);
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("Ana").is_ok());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name(&"ñ".repeat(50)).is_ok());
        assert!(validate_display_name(&"ñ".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(70.0).is_ok());
        assert!(validate_weight(10.0).is_err());
        assert!(validate_weight(600.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_food_and_training_values() {
        assert!(validate_calories(0.0).is_ok());
        assert!(validate_calories(-1.0).is_err());
        assert!(validate_non_negative(12.5).is_ok());
        assert!(validate_non_negative(f64::INFINITY).is_err());
        assert!(validate_sets(0).is_err());
        assert!(validate_reps(12).is_ok());
        assert!(validate_load(0.0).is_ok());
        assert!(validate_load(-2.5).is_err());
    }

    #[test]
    fn test_field_wraps_message() {
        let err = field("email", validate_email("bad")).unwrap_err();
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Invalid email format");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_weight_range(weight in 20.0f64..=500.0) {
            prop_assert!(validate_weight(weight).is_ok());
        }

        #[test]
        fn prop_invalid_weight_below_min(weight in 0.0f64..20.0) {
            prop_assert!(validate_weight(weight).is_err());
        }

        #[test]
        fn prop_password_length_valid(len in 8usize..=128) {
            let password: String = (0..len).map(|_| 'a').collect();
            prop_assert!(validate_password(&password).is_ok());
        }
    }
}
