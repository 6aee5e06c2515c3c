//! Weight unit conversion
//!
//! Weights are stored in kilograms everywhere and converted to the user's
//! preferred unit only at the API boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pounds per kilogram
pub const KG_TO_LBS: f64 = 2.20462;

/// Weight unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value / KG_TO_LBS,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg * KG_TO_LBS,
        }
    }

    /// Convert from kilograms and round for display
    pub fn display(&self, kg: f64, decimals: u32) -> f64 {
        round_to(self.from_kg(kg), decimals)
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }

    /// The other unit, used when toggling the preference
    pub fn toggled(&self) -> Self {
        match self {
            WeightUnit::Kg => WeightUnit::Lbs,
            WeightUnit::Lbs => WeightUnit::Kg,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

/// Round a value to a fixed number of decimals
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lbs_conversion_uses_fixed_factor() {
        assert!((WeightUnit::Lbs.from_kg(100.0) - 220.462).abs() < 1e-9);
        assert!((WeightUnit::Lbs.to_kg(220.462) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_kg_is_identity() {
        assert_eq!(WeightUnit::Kg.to_kg(72.5), 72.5);
        assert_eq!(WeightUnit::Kg.from_kg(72.5), 72.5);
    }

    #[test]
    fn test_display_rounding() {
        assert_eq!(WeightUnit::Lbs.display(80.0, 1), 176.4);
        assert_eq!(WeightUnit::Kg.display(80.456, 2), 80.46);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("LBS".parse::<WeightUnit>().unwrap(), WeightUnit::Lbs);
        assert_eq!("kilograms".parse::<WeightUnit>().unwrap(), WeightUnit::Kg);
        assert!("stone".parse::<WeightUnit>().is_err());
        assert_eq!(WeightUnit::Lbs.to_string(), "lbs");
        assert_eq!(WeightUnit::Kg.toggled(), WeightUnit::Lbs);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&WeightUnit::Lbs).unwrap(), "\"lbs\"");
        let unit: WeightUnit = serde_json::from_str("\"kg\"").unwrap();
        assert_eq!(unit, WeightUnit::Kg);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Converting to a unit and back preserves the kilogram value
        #[test]
        fn prop_unit_conversion_is_reversible(kg in 20.0f64..500.0) {
            for unit in [WeightUnit::Kg, WeightUnit::Lbs] {
                let back = unit.to_kg(unit.from_kg(kg));
                prop_assert!((back - kg).abs() < 1e-9);
            }
        }
    }
}
