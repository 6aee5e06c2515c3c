//! API request and response types

use crate::energy::{ActivityLevel, BiologicalSex};
use crate::errors::ValidationError;
use crate::models::{Diet, MealSlot, Routine, RoutineDay};
use crate::progress::{GoalDirection, ProgressStatus};
use crate::streak::{CalendarDay, DayOfWeek};
use crate::units::WeightUnit;
use crate::validation::{self, field};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Generic acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Auth
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        field("email", validation::validate_email(&self.email))?;
        field("password", validation::validate_password(&self.password))?;
        field("display_name", validation::validate_display_name(&self.display_name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Neutral answer to a reset request; the token is only present outside
/// production deployments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordUpdateRequest {
    pub reset_token: String,
    pub new_password: String,
}

// ============================================================================
// Profile and dashboard
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub display_name: String,
    pub email: String,
    pub weight_unit: WeightUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight_kg: Option<f64>,
    /// Current weight in the preferred unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    pub routine_streak: u32,
    pub diet_streak: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub weight_unit: Option<WeightUnit>,
}

impl UpdatePreferencesRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.display_name {
            Some(name) => field("display_name", validation::validate_display_name(name)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub display_name: String,
    pub routine_streak: u32,
    pub diet_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    pub weight_unit: WeightUnit,
}

// ============================================================================
// Progress
// ============================================================================

/// Start a weight goal; weights are in `unit` (defaults to the user's preference)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProgressRequest {
    pub current_weight: f64,
    pub target_weight: f64,
    #[serde(default)]
    pub unit: Option<WeightUnit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProgressRequest {
    pub current_weight: f64,
    #[serde(default)]
    pub unit: Option<WeightUnit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub id: String,
    pub start_weight_kg: f64,
    pub current_weight_kg: f64,
    pub target_weight_kg: f64,
    pub start_weight: f64,
    pub current_weight: f64,
    pub target_weight: f64,
    pub unit: WeightUnit,
    pub direction: GoalDirection,
    pub progress_percent: f64,
    pub goal_reached: bool,
    pub status: ProgressStatus,
    pub started_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveProgressResponse {
    pub progress: Option<ProgressResponse>,
    pub weight_unit: WeightUnit,
}

// ============================================================================
// Energy
// ============================================================================

/// Activity level as submitted: a level name or the raw multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityLevelInput {
    Multiplier(f64),
    Named(String),
}

impl ActivityLevelInput {
    pub fn resolve(&self) -> Result<ActivityLevel, ValidationError> {
        let level = match self {
            ActivityLevelInput::Multiplier(value) => ActivityLevel::from_multiplier(*value)
                .ok_or_else(|| format!("Unknown activity multiplier: {}", value)),
            ActivityLevelInput::Named(name) => name.parse::<ActivityLevel>(),
        };
        level.map_err(|message| ValidationError::new("activity_level", message))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyRequest {
    pub sex: BiologicalSex,
    pub age: u32,
    pub height_cm: f64,
    pub weight: f64,
    #[serde(default)]
    pub unit: Option<WeightUnit>,
    pub activity_level: ActivityLevelInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyResponse {
    pub sex: BiologicalSex,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// Weight in the preferred unit
    pub weight: f64,
    pub unit: WeightUnit,
    pub activity_level: ActivityLevel,
    pub activity_multiplier: f64,
    pub bmr: f64,
    pub maintenance_calories: i32,
    pub deficit_calories: i32,
    pub surplus_calories: i32,
    pub ideal_weight_kg: f64,
    pub ideal_weight: f64,
    pub calculated_at: DateTime<Utc>,
}

// ============================================================================
// Routines
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineExerciseInput {
    pub exercise_id: i64,
    pub sets: i32,
    pub reps: i32,
    #[serde(default)]
    pub load_kg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineDayInput {
    pub weekday: DayOfWeek,
    #[serde(default)]
    pub exercises: Vec<RoutineExerciseInput>,
}

/// Complete routine as created or replaced by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineRequest {
    pub name: String,
    #[serde(default)]
    pub days: Vec<RoutineDayInput>,
}

impl RoutineRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        field("name", validation::validate_routine_name(&self.name))?;

        let mut seen = BTreeSet::new();
        for day in &self.days {
            if !seen.insert(day.weekday) {
                return Err(ValidationError::new(
                    "weekday",
                    format!("{} appears more than once", day.weekday),
                ));
            }
            for exercise in &day.exercises {
                field("sets", validation::validate_sets(exercise.sets))?;
                field("reps", validation::validate_reps(exercise.reps))?;
                if let Some(load) = exercise.load_kg {
                    field("load_kg", validation::validate_load(load))?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineOverview {
    pub routines: Vec<Routine>,
    pub active_routine: Option<Routine>,
    pub streak: u32,
    pub calendar: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineTrackerResponse {
    pub date: NaiveDate,
    pub today: Option<RoutineDay>,
    pub completed: bool,
    pub compliance_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceUpdateRequest {
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub completed: bool,
}

// ============================================================================
// Diet
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFoodRequest {
    pub weekday: DayOfWeek,
    pub meal: MealSlot,
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub grams: f64,
}

impl AddFoodRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        field("name", validation::validate_food_name(&self.name))?;
        field("calories", validation::validate_calories(self.calories))?;
        field("protein_g", validation::validate_non_negative(self.protein_g))?;
        field("fat_g", validation::validate_non_negative(self.fat_g))?;
        field("carbs_g", validation::validate_non_negative(self.carbs_g))?;
        field("grams", validation::validate_non_negative(self.grams))
    }
}

/// Partial food update; absent fields keep their value
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateFoodRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub grams: Option<f64>,
}

impl UpdateFoodRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            field("name", validation::validate_food_name(name))?;
        }
        if let Some(calories) = self.calories {
            field("calories", validation::validate_calories(calories))?;
        }
        for (name, value) in [
            ("protein_g", self.protein_g),
            ("fat_g", self.fat_g),
            ("carbs_g", self.carbs_g),
            ("grams", self.grams),
        ] {
            if let Some(value) = value {
                field(name, validation::validate_non_negative(value))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietOverview {
    pub diet: Diet,
    pub streak: u32,
    pub calendar: Vec<CalendarDay>,
    pub daily_calories: BTreeMap<DayOfWeek, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealStatus {
    pub meal_slot_id: i64,
    pub meal: MealSlot,
    pub completed: bool,
    pub compliance_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietTrackerResponse {
    pub date: NaiveDate,
    pub completed: bool,
    pub day_compliance_id: Option<i64>,
    pub meals: Vec<MealStatus>,
}
