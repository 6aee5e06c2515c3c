//! Data models for the FitControl application

use crate::streak::{DayOfWeek, WeeklySchedule};
use crate::units::WeightUnit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user display preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub display_name: String,
    pub weight_unit: WeightUnit,
}

// ============================================================================
// Exercise catalog
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroup {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Muscle {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub muscle_id: i64,
    pub name: String,
    pub description: String,
}

// ============================================================================
// Routines
// ============================================================================

/// Exercise prescribed on a routine day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineExercise {
    pub id: i64,
    pub exercise: Exercise,
    pub sets: i32,
    pub reps: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_kg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineDay {
    pub id: i64,
    pub routine_id: i64,
    pub weekday: DayOfWeek,
    pub exercises: Vec<RoutineExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub days: Vec<RoutineDay>,
}

impl Routine {
    /// Weekdays this routine trains on
    pub fn schedule(&self) -> WeeklySchedule {
        self.days.iter().map(|day| day.weekday).collect()
    }

    pub fn day_for(&self, weekday: DayOfWeek) -> Option<&RoutineDay> {
        self.days.iter().find(|day| day.weekday == weekday)
    }
}

// ============================================================================
// Diet
// ============================================================================

/// Meal of the day a food item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snacks => "snacks",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "desayuno" => Ok(MealSlot::Breakfast),
            "lunch" | "almuerzo" => Ok(MealSlot::Lunch),
            "dinner" | "cena" => Ok(MealSlot::Dinner),
            "snacks" | "snack" => Ok(MealSlot::Snacks),
            _ => Err(format!("Unknown meal: {}", s)),
        }
    }
}

impl TryFrom<String> for MealSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub meal_slot_id: i64,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub grams: f64,
}

/// One weekday/meal cell of the diet plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanSlot {
    pub id: i64,
    pub weekday: DayOfWeek,
    pub meal: MealSlot,
    pub foods: Vec<FoodItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diet {
    pub id: i64,
    pub name: String,
    pub slots: Vec<MealPlanSlot>,
}

impl Diet {
    /// Weekdays with at least one planned food
    pub fn schedule(&self) -> WeeklySchedule {
        self.slots
            .iter()
            .filter(|slot| !slot.foods.is_empty())
            .map(|slot| slot.weekday)
            .collect()
    }

    /// Slots of a weekday that contain food, in meal order
    pub fn meals_on(&self, weekday: DayOfWeek) -> Vec<&MealPlanSlot> {
        let mut slots: Vec<_> = self
            .slots
            .iter()
            .filter(|slot| slot.weekday == weekday && !slot.foods.is_empty())
            .collect();
        slots.sort_by_key(|slot| slot.meal);
        slots
    }

    /// Planned calories per weekday
    pub fn daily_calories(&self) -> BTreeMap<DayOfWeek, f64> {
        let mut totals = BTreeMap::new();
        for slot in &self.slots {
            let sum: f64 = slot.foods.iter().map(|food| food.calories).sum();
            *totals.entry(slot.weekday).or_insert(0.0) += sum;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(id: i64, calories: f64) -> FoodItem {
        FoodItem {
            id,
            meal_slot_id: 1,
            name: format!("food {}", id),
            calories,
            protein_g: 0.0,
            fat_g: 0.0,
            carbs_g: 0.0,
            grams: 100.0,
        }
    }

    fn slot(id: i64, weekday: DayOfWeek, meal: MealSlot, foods: Vec<FoodItem>) -> MealPlanSlot {
        MealPlanSlot { id, weekday, meal, foods }
    }

    #[test]
    fn test_meal_slot_accepts_spanish_names() {
        assert_eq!("Desayuno".parse::<MealSlot>().unwrap(), MealSlot::Breakfast);
        assert_eq!("cena".parse::<MealSlot>().unwrap(), MealSlot::Dinner);
        let meal: MealSlot = serde_json::from_str("\"Almuerzo\"").unwrap();
        assert_eq!(meal, MealSlot::Lunch);
        assert_eq!(serde_json::to_string(&MealSlot::Snacks).unwrap(), "\"snacks\"");
        assert!("brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn test_diet_schedule_ignores_empty_slots() {
        let diet = Diet {
            id: 1,
            name: "Plan".to_string(),
            slots: vec![
                slot(1, DayOfWeek::Monday, MealSlot::Lunch, vec![food(1, 500.0)]),
                slot(2, DayOfWeek::Tuesday, MealSlot::Dinner, vec![]),
                slot(3, DayOfWeek::Monday, MealSlot::Breakfast, vec![food(2, 300.0), food(3, 50.0)]),
            ],
        };

        let schedule = diet.schedule();
        assert!(schedule.contains(DayOfWeek::Monday));
        assert!(!schedule.contains(DayOfWeek::Tuesday));
        assert_eq!(diet.daily_calories()[&DayOfWeek::Monday], 850.0);

        let meals = diet.meals_on(DayOfWeek::Monday);
        assert_eq!(meals[0].meal, MealSlot::Breakfast);
        assert_eq!(meals[1].meal, MealSlot::Lunch);
    }

    #[test]
    fn test_routine_schedule() {
        let routine = Routine {
            id: 1,
            name: "Push/Pull".to_string(),
            created_at: Utc::now(),
            days: vec![
                RoutineDay { id: 10, routine_id: 1, weekday: DayOfWeek::Monday, exercises: vec![] },
                RoutineDay { id: 11, routine_id: 1, weekday: DayOfWeek::Thursday, exercises: vec![] },
            ],
        };
        assert_eq!(routine.schedule().len(), 2);
        assert_eq!(routine.day_for(DayOfWeek::Thursday).map(|d| d.id), Some(11));
        assert!(routine.day_for(DayOfWeek::Friday).is_none());
    }
}
