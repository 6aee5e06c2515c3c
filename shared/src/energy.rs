//! Energy expenditure calculations
//!
//! Computes basal metabolic rate, maintenance calories and the deficit and
//! surplus targets from a user's body profile, plus an ideal-weight estimate.
//! All functions are pure; inputs are SI units (kg, cm).

use crate::errors::ValidationError;
use crate::units::round_to;
use serde::{Deserialize, Serialize};

/// Calories removed from or added to maintenance for loss and gain targets
pub const CALORIE_ADJUSTMENT: i32 = 500;

/// Lowest daily target ever suggested for weight loss
pub const MIN_DEFICIT_CALORIES: i32 = 1200;

/// Biological sex for physiological calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    #[serde(alias = "hombre")]
    Male,
    #[serde(alias = "mujer")]
    Female,
}

impl BiologicalSex {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiologicalSex::Male => "male",
            BiologicalSex::Female => "female",
        }
    }
}

impl std::str::FromStr for BiologicalSex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "hombre" => Ok(BiologicalSex::Male),
            "female" | "mujer" => Ok(BiologicalSex::Female),
            _ => Err(format!("Unknown biological sex: {}", s)),
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Training twice a day
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Map a raw multiplier (as submitted by older clients) back to a level
    pub fn from_multiplier(value: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| (level.multiplier() - value).abs() < 1e-6)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise, twice a day",
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Some(level) = Self::ALL.into_iter().find(|l| l.as_str() == normalized) {
            return Ok(level);
        }
        normalized
            .parse::<f64>()
            .ok()
            .and_then(Self::from_multiplier)
            .ok_or_else(|| format!("Unknown activity level: {}", s))
    }
}

/// Body profile used for energy calculations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyProfile {
    pub sex: BiologicalSex,
    pub age_years: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
}

impl EnergyProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(10..=120).contains(&self.age_years) {
            return Err(ValidationError::new("age", "Age must be between 10 and 120"));
        }
        if !self.height_cm.is_finite() || !(50.0..=272.0).contains(&self.height_cm) {
            return Err(ValidationError::new(
                "height_cm",
                "Height must be between 50 and 272 cm",
            ));
        }
        crate::validation::validate_weight(self.weight_kg)
            .map_err(|msg| ValidationError::new("weight", msg))
    }
}

/// Result of an energy expenditure calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyExpenditure {
    /// Basal metabolic rate (kcal/day)
    pub bmr: f64,
    pub activity_multiplier: f64,
    pub maintenance_calories: i32,
    pub deficit_calories: i32,
    pub surplus_calories: i32,
    pub ideal_weight_kg: f64,
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, sex: BiologicalSex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match sex {
        BiologicalSex::Male => base + 5.0,
        BiologicalSex::Female => base - 161.0,
    }
}

/// Ideal body weight: mean of the Devine, Robinson, Miller and Hamwi formulas
pub fn calculate_ideal_weight(height_cm: f64, sex: BiologicalSex) -> f64 {
    let inches_over_5ft = (height_cm / 2.54 - 60.0).max(0.0);

    let estimates = match sex {
        BiologicalSex::Male => [
            50.0 + 2.3 * inches_over_5ft,
            52.0 + 1.9 * inches_over_5ft,
            56.2 + 1.41 * inches_over_5ft,
            48.0 + 2.7 * inches_over_5ft,
        ],
        BiologicalSex::Female => [
            45.5 + 2.3 * inches_over_5ft,
            49.0 + 1.7 * inches_over_5ft,
            53.1 + 1.36 * inches_over_5ft,
            45.5 + 2.2 * inches_over_5ft,
        ],
    };

    estimates.iter().sum::<f64>() / estimates.len() as f64
}

/// Compute the full energy expenditure for a profile
pub fn calculate_expenditure(profile: &EnergyProfile) -> EnergyExpenditure {
    let bmr = calculate_bmr(
        profile.weight_kg,
        profile.height_cm,
        profile.age_years,
        profile.sex,
    );
    let multiplier = profile.activity_level.multiplier();
    let maintenance = (bmr * multiplier).round() as i32;

    EnergyExpenditure {
        bmr: round_to(bmr, 1),
        activity_multiplier: multiplier,
        maintenance_calories: maintenance,
        deficit_calories: (maintenance - CALORIE_ADJUSTMENT).max(MIN_DEFICIT_CALORIES),
        surplus_calories: maintenance + CALORIE_ADJUSTMENT,
        ideal_weight_kg: round_to(calculate_ideal_weight(profile.height_cm, profile.sex), 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn profile(sex: BiologicalSex, level: ActivityLevel) -> EnergyProfile {
        EnergyProfile {
            sex,
            age_years: 30,
            height_cm: 180.0,
            weight_kg: 80.0,
            activity_level: level,
        }
    }

    #[test]
    fn test_mifflin_known_values() {
        // 10*80 + 6.25*180 - 5*30 = 1775
        assert_eq!(calculate_bmr(80.0, 180.0, 30, BiologicalSex::Male), 1780.0);
        assert_eq!(calculate_bmr(80.0, 180.0, 30, BiologicalSex::Female), 1614.0);
    }

    #[test]
    fn test_expenditure_targets() {
        let result = calculate_expenditure(&profile(BiologicalSex::Male, ActivityLevel::ModeratelyActive));
        assert_eq!(result.maintenance_calories, 2759);
        assert_eq!(result.deficit_calories, 2259);
        assert_eq!(result.surplus_calories, 3259);
        assert_eq!(result.activity_multiplier, 1.55);
    }

    #[test]
    fn test_deficit_never_below_floor() {
        let small = EnergyProfile {
            sex: BiologicalSex::Female,
            age_years: 80,
            height_cm: 150.0,
            weight_kg: 40.0,
            activity_level: ActivityLevel::Sedentary,
        };
        let result = calculate_expenditure(&small);
        assert_eq!(result.deficit_calories, MIN_DEFICIT_CALORIES);
    }

    #[test]
    fn test_ideal_weight_range() {
        let male = calculate_ideal_weight(180.0, BiologicalSex::Male);
        assert!(male > 65.0 && male < 85.0);
        let female = calculate_ideal_weight(165.0, BiologicalSex::Female);
        assert!(female > 50.0 && female < 70.0);
    }

    #[test]
    fn test_activity_level_parsing() {
        assert_eq!("very_active".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("1.375".parse::<ActivityLevel>().unwrap(), ActivityLevel::LightlyActive);
        assert!("1.3".parse::<ActivityLevel>().is_err());
        assert_eq!(ActivityLevel::from_multiplier(1.9), Some(ActivityLevel::ExtraActive));
    }

    #[test]
    fn test_sex_aliases() {
        let sex: BiologicalSex = serde_json::from_str("\"mujer\"").unwrap();
        assert_eq!(sex, BiologicalSex::Female);
        assert_eq!("Hombre".parse::<BiologicalSex>().unwrap(), BiologicalSex::Male);
    }

    #[test]
    fn test_profile_validation() {
        let mut p = profile(BiologicalSex::Male, ActivityLevel::Sedentary);
        assert!(p.validate().is_ok());
        p.age_years = 5;
        assert_eq!(p.validate().unwrap_err().field, "age");
        p.age_years = 30;
        p.height_cm = 10.0;
        assert_eq!(p.validate().unwrap_err().field, "height_cm");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// More activity never lowers maintenance calories
        #[test]
        fn prop_maintenance_monotonic_in_activity(
            weight in 40.0f64..150.0,
            height in 140.0f64..210.0,
            age in 18u32..80
        ) {
            let mut last = 0;
            for level in ActivityLevel::ALL {
                let p = EnergyProfile {
                    sex: BiologicalSex::Female,
                    age_years: age,
                    height_cm: height,
                    weight_kg: weight,
                    activity_level: level,
                };
                let result = calculate_expenditure(&p);
                prop_assert!(result.maintenance_calories >= last);
                prop_assert!(result.surplus_calories > result.maintenance_calories);
                last = result.maintenance_calories;
            }
        }
    }
}
