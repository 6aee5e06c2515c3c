//! Diet plan, food items and meal/day compliance

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use fitcontrol_shared::{AddFoodRequest, UpdateFoodRequest};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DietRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealSlotRecord {
    pub id: i64,
    pub diet_id: i64,
    pub weekday: String,
    pub meal: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRecord {
    pub id: i64,
    pub meal_slot_id: i64,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub grams: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealComplianceRecord {
    pub id: i64,
    pub meal_slot_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DayComplianceRecord {
    pub id: i64,
    pub diet_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
}

pub struct DietRepository;

impl DietRepository {
    /// The user's diet, created with `name` on first access
    pub async fn get_or_create(pool: &PgPool, user_id: Uuid, name: &str) -> Result<DietRecord> {
        let record = sqlx::query_as::<_, DietRecord>(
            r#"
            INSERT INTO diets (user_id, name)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn slots(pool: &PgPool, diet_id: i64) -> Result<Vec<MealSlotRecord>> {
        let records = sqlx::query_as::<_, MealSlotRecord>(
            "SELECT id, diet_id, weekday, meal FROM diet_meal_slots WHERE diet_id = $1 ORDER BY id",
        )
        .bind(diet_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn foods(pool: &PgPool, diet_id: i64) -> Result<Vec<FoodRecord>> {
        let records = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT f.id, f.meal_slot_id, f.name, f.calories, f.protein_g, f.fat_g, f.carbs_g, f.grams
            FROM diet_foods f
            JOIN diet_meal_slots s ON s.id = f.meal_slot_id
            WHERE s.diet_id = $1
            ORDER BY f.meal_slot_id, f.id
            "#,
        )
        .bind(diet_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Id of the weekday/meal slot, creating the slot if needed
    pub async fn ensure_slot(pool: &PgPool, diet_id: i64, weekday: &str, meal: &str) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO diet_meal_slots (diet_id, weekday, meal)
            VALUES ($1, $2, $3)
            ON CONFLICT (diet_id, weekday, meal) DO UPDATE SET meal = EXCLUDED.meal
            RETURNING id
            "#,
        )
        .bind(diet_id)
        .bind(weekday)
        .bind(meal)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    pub async fn add_food(pool: &PgPool, meal_slot_id: i64, input: &AddFoodRequest) -> Result<FoodRecord> {
        let record = sqlx::query_as::<_, FoodRecord>(
            r#"
            INSERT INTO diet_foods (meal_slot_id, name, calories, protein_g, fat_g, carbs_g, grams)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, meal_slot_id, name, calories, protein_g, fat_g, carbs_g, grams
            "#,
        )
        .bind(meal_slot_id)
        .bind(input.name.trim())
        .bind(input.calories)
        .bind(input.protein_g)
        .bind(input.fat_g)
        .bind(input.carbs_g)
        .bind(input.grams)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Partially update a food item owned by the user
    pub async fn update_food(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        input: &UpdateFoodRequest,
    ) -> Result<Option<FoodRecord>> {
        let record = sqlx::query_as::<_, FoodRecord>(
            r#"
            UPDATE diet_foods f SET
                name = COALESCE($3, f.name),
                calories = COALESCE($4, f.calories),
                protein_g = COALESCE($5, f.protein_g),
                fat_g = COALESCE($6, f.fat_g),
                carbs_g = COALESCE($7, f.carbs_g),
                grams = COALESCE($8, f.grams)
            FROM diet_meal_slots s
            JOIN diets d ON d.id = s.diet_id
            WHERE f.id = $1 AND f.meal_slot_id = s.id AND d.user_id = $2
            RETURNING f.id, f.meal_slot_id, f.name, f.calories, f.protein_g, f.fat_g, f.carbs_g, f.grams
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.calories)
        .bind(input.protein_g)
        .bind(input.fat_g)
        .bind(input.carbs_g)
        .bind(input.grams)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn delete_food(pool: &PgPool, user_id: Uuid, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM diet_foods f
            USING diet_meal_slots s, diets d
            WHERE f.id = $1 AND f.meal_slot_id = s.id AND s.diet_id = d.id AND d.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn day_compliance_since(
        pool: &PgPool,
        diet_id: i64,
        since: NaiveDate,
    ) -> Result<Vec<DayComplianceRecord>> {
        let records = sqlx::query_as::<_, DayComplianceRecord>(
            r#"
            SELECT id, diet_id, date, completed
            FROM diet_day_compliance
            WHERE diet_id = $1 AND date >= $2
            ORDER BY date
            "#,
        )
        .bind(diet_id)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn ensure_day_compliance(pool: &PgPool, diet_id: i64, date: NaiveDate) -> Result<DayComplianceRecord> {
        let record = sqlx::query_as::<_, DayComplianceRecord>(
            r#"
            INSERT INTO diet_day_compliance (diet_id, date, completed)
            VALUES ($1, $2, FALSE)
            ON CONFLICT (diet_id, date) DO UPDATE SET diet_id = EXCLUDED.diet_id
            RETURNING id, diet_id, date, completed
            "#,
        )
        .bind(diet_id)
        .bind(date)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn ensure_meal_compliance(
        pool: &PgPool,
        meal_slot_id: i64,
        date: NaiveDate,
    ) -> Result<MealComplianceRecord> {
        let record = sqlx::query_as::<_, MealComplianceRecord>(
            r#"
            INSERT INTO diet_meal_compliance (meal_slot_id, date, completed)
            VALUES ($1, $2, FALSE)
            ON CONFLICT (meal_slot_id, date) DO UPDATE SET meal_slot_id = EXCLUDED.meal_slot_id
            RETURNING id, meal_slot_id, date, completed
            "#,
        )
        .bind(meal_slot_id)
        .bind(date)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn update_meal_compliance(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        completed: bool,
    ) -> Result<Option<MealComplianceRecord>> {
        let record = sqlx::query_as::<_, MealComplianceRecord>(
            r#"
            UPDATE diet_meal_compliance c
            SET completed = $3
            FROM diet_meal_slots s
            JOIN diets d ON d.id = s.diet_id
            WHERE c.id = $1 AND c.meal_slot_id = s.id AND d.user_id = $2
            RETURNING c.id, c.meal_slot_id, c.date, c.completed
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// A day compliance record, if it belongs to the user
    pub async fn find_day_compliance(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
    ) -> Result<Option<DayComplianceRecord>> {
        let record = sqlx::query_as::<_, DayComplianceRecord>(
            r#"
            SELECT c.id, c.diet_id, c.date, c.completed
            FROM diet_day_compliance c
            JOIN diets d ON d.id = c.diet_id
            WHERE c.id = $1 AND d.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn meal_compliance_on(
        pool: &PgPool,
        diet_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<MealComplianceRecord>> {
        let records = sqlx::query_as::<_, MealComplianceRecord>(
            r#"
            SELECT c.id, c.meal_slot_id, c.date, c.completed
            FROM diet_meal_compliance c
            JOIN diet_meal_slots s ON s.id = c.meal_slot_id
            WHERE s.diet_id = $1 AND c.date = $2
            "#,
        )
        .bind(diet_id)
        .bind(date)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn update_day_compliance(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        completed: bool,
    ) -> Result<Option<DayComplianceRecord>> {
        let record = sqlx::query_as::<_, DayComplianceRecord>(
            r#"
            UPDATE diet_day_compliance c
            SET completed = $3
            FROM diets d
            WHERE c.id = $1 AND c.diet_id = d.id AND d.user_id = $2
            RETURNING c.id, c.diet_id, c.date, c.completed
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
