//! Stored energy expenditure calculation, one row per user

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::to_decimal;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EnergyRecord {
    pub user_id: Uuid,
    pub sex: String,
    pub age: i32,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub activity_level: String,
    pub bmr: Decimal,
    pub maintenance_calories: i32,
    pub deficit_calories: i32,
    pub surplus_calories: i32,
    pub ideal_weight_kg: Decimal,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UpsertEnergy {
    pub user_id: Uuid,
    pub sex: String,
    pub age: i32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: String,
    pub bmr: f64,
    pub maintenance_calories: i32,
    pub deficit_calories: i32,
    pub surplus_calories: i32,
    pub ideal_weight_kg: f64,
}

pub struct EnergyRepository;

impl EnergyRepository {
    pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<EnergyRecord>> {
        let record = sqlx::query_as::<_, EnergyRecord>(
            r#"
            SELECT user_id, sex, age, height_cm, weight_kg, activity_level, bmr,
                   maintenance_calories, deficit_calories, surplus_calories,
                   ideal_weight_kg, calculated_at
            FROM energy_calculations
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Insert or overwrite the user's calculation
    pub async fn upsert(pool: &PgPool, input: UpsertEnergy) -> Result<EnergyRecord> {
        let record = sqlx::query_as::<_, EnergyRecord>(
            r#"
            INSERT INTO energy_calculations (
                user_id, sex, age, height_cm, weight_kg, activity_level, bmr,
                maintenance_calories, deficit_calories, surplus_calories, ideal_weight_kg
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE SET
                sex = EXCLUDED.sex,
                age = EXCLUDED.age,
                height_cm = EXCLUDED.height_cm,
                weight_kg = EXCLUDED.weight_kg,
                activity_level = EXCLUDED.activity_level,
                bmr = EXCLUDED.bmr,
                maintenance_calories = EXCLUDED.maintenance_calories,
                deficit_calories = EXCLUDED.deficit_calories,
                surplus_calories = EXCLUDED.surplus_calories,
                ideal_weight_kg = EXCLUDED.ideal_weight_kg,
                calculated_at = NOW()
            RETURNING user_id, sex, age, height_cm, weight_kg, activity_level, bmr,
                      maintenance_calories, deficit_calories, surplus_calories,
                      ideal_weight_kg, calculated_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.sex)
        .bind(input.age)
        .bind(to_decimal(input.height_cm))
        .bind(to_decimal(input.weight_kg))
        .bind(&input.activity_level)
        .bind(to_decimal(input.bmr))
        .bind(input.maintenance_calories)
        .bind(input.deficit_calories)
        .bind(input.surplus_calories)
        .bind(to_decimal(input.ideal_weight_kg))
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}
