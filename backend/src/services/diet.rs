//! Diet service
//!
//! Each user has a single weekly diet plan, created on first access. A
//! weekday counts as scheduled when at least one of its meals has food, and
//! the streak follows the day-level compliance flag.

use crate::error::ApiError;
use crate::repositories::diet::{DietRecord, FoodRecord, MealComplianceRecord, MealSlotRecord};
use crate::repositories::DietRepository;
use chrono::{Duration, NaiveDate};
use fitcontrol_shared::{
    calculate, index_compliance, AddFoodRequest, ComplianceRecord, ComplianceResponse, DayOfWeek,
    Diet, DietOverview, DietTrackerResponse, FoodItem, MealPlanSlot, MealStatus, StreakResult,
    UpdateFoodRequest, STREAK_LOOKBACK_DAYS,
};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_DIET_NAME: &str = "My diet";

pub struct DietService;

impl DietService {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Diet, ApiError> {
        let record = DietRepository::get_or_create(pool, user_id, DEFAULT_DIET_NAME)
            .await
            .map_err(ApiError::Internal)?;
        Self::load(pool, record).await
    }

    /// Plan, planned calories per weekday, streak and calendar
    pub async fn overview(pool: &PgPool, user_id: Uuid, today: NaiveDate) -> Result<DietOverview, ApiError> {
        let diet = Self::get(pool, user_id).await?;
        let result = Self::streak_for(pool, &diet, today).await?;

        Ok(DietOverview {
            daily_calories: diet.daily_calories(),
            diet,
            streak: result.streak,
            calendar: result.calendar,
        })
    }

    pub async fn current_streak(pool: &PgPool, user_id: Uuid, today: NaiveDate) -> Result<u32, ApiError> {
        let diet = Self::get(pool, user_id).await?;
        Ok(Self::streak_for(pool, &diet, today).await?.streak)
    }

    pub async fn add_food(pool: &PgPool, user_id: Uuid, req: AddFoodRequest) -> Result<FoodItem, ApiError> {
        req.validate()?;

        let diet = DietRepository::get_or_create(pool, user_id, DEFAULT_DIET_NAME)
            .await
            .map_err(ApiError::Internal)?;
        let slot_id = DietRepository::ensure_slot(pool, diet.id, req.weekday.as_str(), req.meal.as_str())
            .await
            .map_err(ApiError::Internal)?;
        let record = DietRepository::add_food(pool, slot_id, &req)
            .await
            .map_err(ApiError::Internal)?;

        info!(
            user_id = %user_id,
            food_id = record.id,
            weekday = %req.weekday,
            meal = %req.meal,
            "Food added to diet"
        );
        Ok(to_food(record))
    }

    pub async fn update_food(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        req: UpdateFoodRequest,
    ) -> Result<FoodItem, ApiError> {
        req.validate()?;

        let record = DietRepository::update_food(pool, user_id, id, &req)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Food item not found".to_string()))?;

        info!(user_id = %user_id, food_id = id, "Food updated");
        Ok(to_food(record))
    }

    pub async fn delete_food(pool: &PgPool, user_id: Uuid, id: i64) -> Result<(), ApiError> {
        let deleted = DietRepository::delete_food(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound("Food item not found".to_string()));
        }

        info!(user_id = %user_id, food_id = id, "Food deleted");
        Ok(())
    }

    /// Today's meals with their compliance, creating missing records
    pub async fn tracker_today(
        pool: &PgPool,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<DietTrackerResponse, ApiError> {
        let diet = Self::get(pool, user_id).await?;
        let meals_today = diet.meals_on(DayOfWeek::of(today));

        if meals_today.is_empty() {
            return Ok(DietTrackerResponse {
                date: today,
                completed: false,
                day_compliance_id: None,
                meals: Vec::new(),
            });
        }

        let day = DietRepository::ensure_day_compliance(pool, diet.id, today)
            .await
            .map_err(ApiError::Internal)?;

        let mut meals = Vec::with_capacity(meals_today.len());
        for slot in meals_today {
            let record = DietRepository::ensure_meal_compliance(pool, slot.id, today)
                .await
                .map_err(ApiError::Internal)?;
            meals.push(MealStatus {
                meal_slot_id: slot.id,
                meal: slot.meal,
                completed: record.completed,
                compliance_id: record.id,
            });
        }

        Ok(DietTrackerResponse {
            date: today,
            completed: day.completed,
            day_compliance_id: Some(day.id),
            meals,
        })
    }

    pub async fn update_meal_compliance(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        completed: bool,
    ) -> Result<ComplianceResponse, ApiError> {
        let record = DietRepository::update_meal_compliance(pool, user_id, id, completed)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Compliance record not found".to_string()))?;

        info!(user_id = %user_id, compliance_id = id, completed, "Meal compliance updated");
        Ok(ComplianceResponse {
            id: record.id,
            date: record.date,
            completed: record.completed,
        })
    }

    /// Mark the whole day as followed or not; this drives the streak.
    /// A day can only be completed once every planned meal is checked.
    pub async fn update_day_compliance(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        completed: bool,
    ) -> Result<ComplianceResponse, ApiError> {
        if completed {
            let day = DietRepository::find_day_compliance(pool, user_id, id)
                .await
                .map_err(ApiError::Internal)?
                .ok_or_else(|| ApiError::NotFound("Compliance record not found".to_string()))?;

            let diet = Self::get(pool, user_id).await?;
            let checked = DietRepository::meal_compliance_on(pool, day.diet_id, day.date)
                .await
                .map_err(ApiError::Internal)?;

            if !all_meals_checked(&diet.meals_on(DayOfWeek::of(day.date)), &checked) {
                return Err(ApiError::Conflict(
                    "Every meal must be checked before completing the day".to_string(),
                ));
            }
        }

        let record = DietRepository::update_day_compliance(pool, user_id, id, completed)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Compliance record not found".to_string()))?;

        info!(user_id = %user_id, compliance_id = id, completed, "Diet day compliance updated");
        Ok(ComplianceResponse {
            id: record.id,
            date: record.date,
            completed: record.completed,
        })
    }

    async fn streak_for(pool: &PgPool, diet: &Diet, today: NaiveDate) -> Result<StreakResult, ApiError> {
        let since = today - Duration::days(STREAK_LOOKBACK_DAYS);
        let records = DietRepository::day_compliance_since(pool, diet.id, since)
            .await
            .map_err(ApiError::Internal)?;

        let compliance = index_compliance(records.iter().map(|record| ComplianceRecord {
            date: record.date,
            completed: record.completed,
        }));
        Ok(calculate(&diet.schedule(), &compliance, today))
    }

    async fn load(pool: &PgPool, record: DietRecord) -> Result<Diet, ApiError> {
        let slots = DietRepository::slots(pool, record.id)
            .await
            .map_err(ApiError::Internal)?;
        let foods = DietRepository::foods(pool, record.id)
            .await
            .map_err(ApiError::Internal)?;

        assemble_diet(record, slots, foods)
    }
}

/// Whether every planned meal has a completed record
pub fn all_meals_checked(meals: &[&MealPlanSlot], records: &[MealComplianceRecord]) -> bool {
    meals.iter().all(|slot| {
        records
            .iter()
            .any(|record| record.meal_slot_id == slot.id && record.completed)
    })
}

fn to_food(record: FoodRecord) -> FoodItem {
    FoodItem {
        id: record.id,
        meal_slot_id: record.meal_slot_id,
        name: record.name,
        calories: record.calories,
        protein_g: record.protein_g,
        fat_g: record.fat_g,
        carbs_g: record.carbs_g,
        grams: record.grams,
    }
}

/// Group food rows under their weekday/meal slots
pub fn assemble_diet(
    record: DietRecord,
    slots: Vec<MealSlotRecord>,
    foods: Vec<FoodRecord>,
) -> Result<Diet, ApiError> {
    let mut foods_by_slot: HashMap<i64, Vec<FoodItem>> = HashMap::new();
    for food in foods {
        foods_by_slot.entry(food.meal_slot_id).or_default().push(to_food(food));
    }

    let mut plan = Vec::with_capacity(slots.len());
    for slot in slots {
        let weekday = slot
            .weekday
            .parse()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Corrupt meal slot {}: {}", slot.id, e)))?;
        let meal = slot
            .meal
            .parse()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Corrupt meal slot {}: {}", slot.id, e)))?;
        plan.push(MealPlanSlot {
            id: slot.id,
            weekday,
            meal,
            foods: foods_by_slot.remove(&slot.id).unwrap_or_default(),
        });
    }
    plan.sort_by_key(|slot: &MealPlanSlot| (slot.weekday, slot.meal));

    Ok(Diet {
        id: record.id,
        name: record.name,
        slots: plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fitcontrol_shared::MealSlot;

    fn diet_record() -> DietRecord {
        DietRecord {
            id: 1,
            user_id: Uuid::nil(),
            name: DEFAULT_DIET_NAME.to_string(),
            created_at: Utc::now(),
        }
    }

    fn slot(id: i64, weekday: &str, meal: &str) -> MealSlotRecord {
        MealSlotRecord {
            id,
            diet_id: 1,
            weekday: weekday.to_string(),
            meal: meal.to_string(),
        }
    }

    fn food(id: i64, slot_id: i64, calories: f64) -> FoodRecord {
        FoodRecord {
            id,
            meal_slot_id: slot_id,
            name: "Oats".to_string(),
            calories,
            protein_g: 10.0,
            fat_g: 5.0,
            carbs_g: 50.0,
            grams: 80.0,
        }
    }

    #[test]
    fn test_assemble_groups_foods() {
        let diet = assemble_diet(
            diet_record(),
            vec![
                slot(1, "tuesday", "dinner"),
                slot(2, "monday", "breakfast"),
                slot(3, "tuesday", "breakfast"),
            ],
            vec![food(1, 1, 600.0), food(2, 2, 350.0), food(3, 1, 150.0)],
        )
        .unwrap();

        assert_eq!(diet.slots[0].weekday, DayOfWeek::Monday);
        assert_eq!(diet.slots[1].meal, MealSlot::Breakfast);
        assert_eq!(diet.slots[2].foods.len(), 2);
        assert_eq!(diet.daily_calories()[&DayOfWeek::Tuesday], 750.0);
    }

    #[test]
    fn test_empty_slot_is_not_scheduled() {
        let diet = assemble_diet(
            diet_record(),
            vec![slot(1, "monday", "lunch"), slot(2, "friday", "snacks")],
            vec![food(1, 2, 200.0)],
        )
        .unwrap();

        let schedule = diet.schedule();
        assert!(!schedule.contains(DayOfWeek::Monday));
        assert!(schedule.contains(DayOfWeek::Friday));
    }

    fn meal_check(slot_id: i64, completed: bool) -> MealComplianceRecord {
        MealComplianceRecord {
            id: slot_id * 10,
            meal_slot_id: slot_id,
            date: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            completed,
        }
    }

    #[test]
    fn test_day_needs_every_meal_checked() {
        let diet = assemble_diet(
            diet_record(),
            vec![slot(10, "tuesday", "breakfast"), slot(11, "tuesday", "lunch")],
            vec![food(1, 10, 300.0), food(2, 11, 600.0)],
        )
        .unwrap();
        let meals = diet.meals_on(DayOfWeek::Tuesday);

        assert!(!all_meals_checked(&meals, &[]));
        assert!(!all_meals_checked(&meals, &[meal_check(10, true), meal_check(11, false)]));
        assert!(all_meals_checked(&meals, &[meal_check(10, true), meal_check(11, true)]));
    }

    #[test]
    fn test_assemble_rejects_unknown_meal() {
        let result = assemble_diet(diet_record(), vec![slot(1, "monday", "brunch")], vec![]);
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }
}
