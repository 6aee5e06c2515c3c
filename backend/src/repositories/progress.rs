//! Weight-goal persistence

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::to_decimal;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgressRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_weight_kg: Decimal,
    pub current_weight_kg: Decimal,
    pub target_weight_kg: Decimal,
    pub status: i16,
    pub started_on: NaiveDate,
    pub finished_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateProgress {
    pub user_id: Uuid,
    pub start_weight_kg: f64,
    pub target_weight_kg: f64,
    pub started_on: NaiveDate,
}

const COLUMNS: &str = "id, user_id, start_weight_kg, current_weight_kg, target_weight_kg, \
                       status, started_on, finished_on, created_at, updated_at";

pub struct ProgressRepository;

impl ProgressRepository {
    /// Insert a new active goal; current weight starts at the start weight
    pub async fn create(pool: &PgPool, input: CreateProgress) -> Result<ProgressRecord> {
        let record = sqlx::query_as::<_, ProgressRecord>(&format!(
            r#"
            INSERT INTO weight_progress (user_id, start_weight_kg, current_weight_kg, target_weight_kg, status, started_on)
            VALUES ($1, $2, $2, $3, 1, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(to_decimal(input.start_weight_kg))
        .bind(to_decimal(input.target_weight_kg))
        .bind(input.started_on)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn find_active(pool: &PgPool, user_id: Uuid) -> Result<Option<ProgressRecord>> {
        let record = sqlx::query_as::<_, ProgressRecord>(&format!(
            "SELECT {COLUMNS} FROM weight_progress WHERE user_id = $1 AND status = 1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Fetch a goal owned by `user_id`
    pub async fn find_by_id(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<ProgressRecord>> {
        let record = sqlx::query_as::<_, ProgressRecord>(&format!(
            "SELECT {COLUMNS} FROM weight_progress WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn update_current_weight(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        current_weight_kg: f64,
    ) -> Result<Option<ProgressRecord>> {
        let record = sqlx::query_as::<_, ProgressRecord>(&format!(
            r#"
            UPDATE weight_progress
            SET current_weight_kg = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(to_decimal(current_weight_kg))
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Mark an active goal finished; already finished goals are left untouched
    pub async fn finish(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        finished_on: NaiveDate,
    ) -> Result<Option<ProgressRecord>> {
        let record = sqlx::query_as::<_, ProgressRecord>(&format!(
            r#"
            UPDATE weight_progress
            SET status = 2, finished_on = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(finished_on)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
