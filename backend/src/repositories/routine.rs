//! Routine plans and their per-date compliance records

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use fitcontrol_shared::RoutineRequest;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::to_decimal;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoutineRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoutineDayRecord {
    pub id: i64,
    pub routine_id: i64,
    pub weekday: String,
}

/// Prescribed exercise joined with its catalog entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoutineExerciseRow {
    pub id: i64,
    pub routine_day_id: i64,
    pub sets: i32,
    pub reps: i32,
    pub load_kg: Option<Decimal>,
    pub exercise_id: i64,
    pub muscle_id: i64,
    pub exercise_name: String,
    pub description: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoutineComplianceRecord {
    pub id: i64,
    pub routine_day_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
}

pub struct RoutineRepository;

impl RoutineRepository {
    /// Routines of a user, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<RoutineRecord>> {
        let records = sqlx::query_as::<_, RoutineRecord>(
            r#"
            SELECT id, user_id, name, created_at
            FROM routines
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn find(pool: &PgPool, user_id: Uuid, id: i64) -> Result<Option<RoutineRecord>> {
        let record = sqlx::query_as::<_, RoutineRecord>(
            "SELECT id, user_id, name, created_at FROM routines WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn days_for(pool: &PgPool, routine_ids: &[i64]) -> Result<Vec<RoutineDayRecord>> {
        let records = sqlx::query_as::<_, RoutineDayRecord>(
            r#"
            SELECT id, routine_id, weekday
            FROM routine_days
            WHERE routine_id = ANY($1)
            ORDER BY routine_id, id
            "#,
        )
        .bind(routine_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn exercises_for(pool: &PgPool, day_ids: &[i64]) -> Result<Vec<RoutineExerciseRow>> {
        let records = sqlx::query_as::<_, RoutineExerciseRow>(
            r#"
            SELECT re.id, re.routine_day_id, re.sets, re.reps, re.load_kg,
                   e.id AS exercise_id, e.muscle_id, e.name AS exercise_name, e.description
            FROM routine_exercises re
            JOIN exercises e ON e.id = re.exercise_id
            WHERE re.routine_day_id = ANY($1)
            ORDER BY re.routine_day_id, re.position
            "#,
        )
        .bind(day_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Create a routine with all its days and exercises atomically
    pub async fn create(pool: &PgPool, user_id: Uuid, input: &RoutineRequest) -> Result<i64> {
        let mut tx = pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO routines (user_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(input.name.trim())
        .fetch_one(&mut *tx)
        .await?;

        Self::write_days(&mut tx, id, input).await?;
        tx.commit().await?;

        Ok(id)
    }

    /// Replace name, days and exercises of a routine
    ///
    /// Days whose weekday survives keep their id and compliance history.
    /// Returns false when the routine does not belong to the user.
    pub async fn replace(pool: &PgPool, user_id: Uuid, id: i64, input: &RoutineRequest) -> Result<bool> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query("UPDATE routines SET name = $3 WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .bind(input.name.trim())
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        let kept: Vec<String> = input.days.iter().map(|d| d.weekday.as_str().to_string()).collect();
        sqlx::query("DELETE FROM routine_days WHERE routine_id = $1 AND NOT (weekday = ANY($2))")
            .bind(id)
            .bind(&kept)
            .execute(&mut *tx)
            .await?;

        Self::write_days(&mut tx, id, input).await?;
        tx.commit().await?;

        Ok(true)
    }

    async fn write_days(
        tx: &mut Transaction<'_, Postgres>,
        routine_id: i64,
        input: &RoutineRequest,
    ) -> Result<()> {
        for day in &input.days {
            let day_id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO routine_days (routine_id, weekday)
                VALUES ($1, $2)
                ON CONFLICT (routine_id, weekday) DO UPDATE SET weekday = EXCLUDED.weekday
                RETURNING id
                "#,
            )
            .bind(routine_id)
            .bind(day.weekday.as_str())
            .fetch_one(&mut **tx)
            .await?;

            sqlx::query("DELETE FROM routine_exercises WHERE routine_day_id = $1")
                .bind(day_id)
                .execute(&mut **tx)
                .await?;

            for (position, exercise) in day.exercises.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO routine_exercises (routine_day_id, exercise_id, position, sets, reps, load_kg)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(day_id)
                .bind(exercise.exercise_id)
                .bind(position as i32)
                .bind(exercise.sets)
                .bind(exercise.reps)
                .bind(exercise.load_kg.map(to_decimal))
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM routines WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Compliance records of the given days on or after `since`
    pub async fn compliance_since(
        pool: &PgPool,
        day_ids: &[i64],
        since: NaiveDate,
    ) -> Result<Vec<RoutineComplianceRecord>> {
        let records = sqlx::query_as::<_, RoutineComplianceRecord>(
            r#"
            SELECT id, routine_day_id, date, completed
            FROM routine_compliance
            WHERE routine_day_id = ANY($1) AND date >= $2
            ORDER BY date
            "#,
        )
        .bind(day_ids)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Fetch the record for a day and date, creating it as not completed
    pub async fn ensure_compliance(
        pool: &PgPool,
        routine_day_id: i64,
        date: NaiveDate,
    ) -> Result<RoutineComplianceRecord> {
        let record = sqlx::query_as::<_, RoutineComplianceRecord>(
            r#"
            INSERT INTO routine_compliance (routine_day_id, date, completed)
            VALUES ($1, $2, FALSE)
            ON CONFLICT (routine_day_id, date) DO UPDATE SET routine_day_id = EXCLUDED.routine_day_id
            RETURNING id, routine_day_id, date, completed
            "#,
        )
        .bind(routine_day_id)
        .bind(date)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Set a compliance flag, only if the record belongs to one of the user's routines
    pub async fn update_compliance(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        completed: bool,
    ) -> Result<Option<RoutineComplianceRecord>> {
        let record = sqlx::query_as::<_, RoutineComplianceRecord>(
            r#"
            UPDATE routine_compliance c
            SET completed = $3
            FROM routine_days d
            JOIN routines r ON r.id = d.routine_id
            WHERE c.id = $1 AND c.routine_day_id = d.id AND r.user_id = $2
            RETURNING c.id, c.routine_day_id, c.date, c.completed
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
