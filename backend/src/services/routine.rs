//! Routine service
//!
//! Assembles routines from their rows, keeps the plan consistent on create
//! and replace, and derives the streak/calendar and today's tracker from the
//! most recently created routine.

use crate::error::ApiError;
use crate::repositories::catalog::CatalogRepository;
use crate::repositories::routine::{
    RoutineComplianceRecord, RoutineDayRecord, RoutineExerciseRow, RoutineRecord,
};
use crate::repositories::{from_decimal, RoutineRepository};
use chrono::{Duration, NaiveDate};
use fitcontrol_shared::{
    calculate, index_compliance, ComplianceRecord, ComplianceResponse, DayOfWeek, Exercise,
    Routine, RoutineDay, RoutineExercise, RoutineOverview, RoutineRequest, RoutineTrackerResponse,
    StreakResult, ValidationError, WeeklySchedule, STREAK_LOOKBACK_DAYS,
};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

pub struct RoutineService;

impl RoutineService {
    /// All routines of the user, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<Routine>, ApiError> {
        let records = RoutineRepository::list(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Self::load(pool, records).await
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, id: i64) -> Result<Routine, ApiError> {
        let record = RoutineRepository::find(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Routine not found".to_string()))?;

        Self::load(pool, vec![record])
            .await?
            .pop()
            .ok_or_else(|| ApiError::NotFound("Routine not found".to_string()))
    }

    pub async fn create(pool: &PgPool, user_id: Uuid, req: RoutineRequest) -> Result<Routine, ApiError> {
        Self::check_request(pool, &req).await?;

        let id = RoutineRepository::create(pool, user_id, &req)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, routine_id = id, days = req.days.len(), "Routine created");
        Self::get(pool, user_id, id).await
    }

    /// Replace a routine's name and plan
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        req: RoutineRequest,
    ) -> Result<Routine, ApiError> {
        Self::check_request(pool, &req).await?;

        let found = RoutineRepository::replace(pool, user_id, id, &req)
            .await
            .map_err(ApiError::Internal)?;
        if !found {
            return Err(ApiError::NotFound("Routine not found".to_string()));
        }

        info!(user_id = %user_id, routine_id = id, "Routine updated");
        Self::get(pool, user_id, id).await
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: i64) -> Result<(), ApiError> {
        let deleted = RoutineRepository::delete(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound("Routine not found".to_string()));
        }

        info!(user_id = %user_id, routine_id = id, "Routine deleted");
        Ok(())
    }

    /// Routines plus streak and calendar of the active one
    pub async fn overview(pool: &PgPool, user_id: Uuid, today: NaiveDate) -> Result<RoutineOverview, ApiError> {
        let routines = Self::list(pool, user_id).await?;
        let active_routine = routines.first().cloned();

        let result = match &active_routine {
            Some(routine) => Self::streak_for(pool, routine, today).await?,
            None => calculate(&WeeklySchedule::new(), &HashMap::<NaiveDate, bool>::new(), today),
        };

        Ok(RoutineOverview {
            routines,
            active_routine,
            streak: result.streak,
            calendar: result.calendar,
        })
    }

    /// Streak of the active routine, zero when the user has none
    pub async fn current_streak(pool: &PgPool, user_id: Uuid, today: NaiveDate) -> Result<u32, ApiError> {
        let active = RoutineRepository::list(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .next();

        match active {
            Some(record) => {
                let routine = Self::load(pool, vec![record])
                    .await?
                    .pop()
                    .ok_or_else(|| ApiError::NotFound("Routine not found".to_string()))?;
                Ok(Self::streak_for(pool, &routine, today).await?.streak)
            }
            None => Ok(0),
        }
    }

    /// Today's plan of the active routine, creating its compliance record
    pub async fn tracker_today(
        pool: &PgPool,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<RoutineTrackerResponse, ApiError> {
        let routines = Self::list(pool, user_id).await?;
        let today_day = routines
            .first()
            .and_then(|routine| routine.day_for(DayOfWeek::of(today)))
            .cloned();

        let Some(day) = today_day else {
            return Ok(RoutineTrackerResponse {
                date: today,
                today: None,
                completed: false,
                compliance_id: None,
            });
        };

        let record = RoutineRepository::ensure_compliance(pool, day.id, today)
            .await
            .map_err(ApiError::Internal)?;

        Ok(RoutineTrackerResponse {
            date: today,
            today: Some(day),
            completed: record.completed,
            compliance_id: Some(record.id),
        })
    }

    pub async fn update_compliance(
        pool: &PgPool,
        user_id: Uuid,
        id: i64,
        completed: bool,
    ) -> Result<ComplianceResponse, ApiError> {
        let record = RoutineRepository::update_compliance(pool, user_id, id, completed)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Compliance record not found".to_string()))?;

        info!(user_id = %user_id, compliance_id = id, completed, "Routine compliance updated");
        Ok(ComplianceResponse {
            id: record.id,
            date: record.date,
            completed: record.completed,
        })
    }

    async fn streak_for(pool: &PgPool, routine: &Routine, today: NaiveDate) -> Result<StreakResult, ApiError> {
        let day_ids: Vec<i64> = routine.days.iter().map(|day| day.id).collect();
        let since = today - Duration::days(STREAK_LOOKBACK_DAYS);

        let records = RoutineRepository::compliance_since(pool, &day_ids, since)
            .await
            .map_err(ApiError::Internal)?;

        Ok(calculate(
            &routine.schedule(),
            &index_compliance(records.iter().map(to_compliance)),
            today,
        ))
    }

    async fn check_request(pool: &PgPool, req: &RoutineRequest) -> Result<(), ApiError> {
        req.validate()?;

        let mut ids: Vec<i64> = req
            .days
            .iter()
            .flat_map(|day| day.exercises.iter().map(|e| e.exercise_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let missing = CatalogRepository::missing_exercises(pool, &ids)
            .await
            .map_err(ApiError::Internal)?;
        if let Some(id) = missing.first() {
            return Err(ValidationError::new("exercise_id", format!("Unknown exercise: {}", id)).into());
        }
        Ok(())
    }

    async fn load(pool: &PgPool, records: Vec<RoutineRecord>) -> Result<Vec<Routine>, ApiError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let routine_ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let days = RoutineRepository::days_for(pool, &routine_ids)
            .await
            .map_err(ApiError::Internal)?;
        let day_ids: Vec<i64> = days.iter().map(|d| d.id).collect();
        let exercises = RoutineRepository::exercises_for(pool, &day_ids)
            .await
            .map_err(ApiError::Internal)?;

        assemble_routines(records, days, exercises)
    }
}

fn to_compliance(record: &RoutineComplianceRecord) -> ComplianceRecord {
    ComplianceRecord {
        date: record.date,
        completed: record.completed,
    }
}

/// Nest day and exercise rows under their routines, keeping row order
pub fn assemble_routines(
    records: Vec<RoutineRecord>,
    days: Vec<RoutineDayRecord>,
    exercises: Vec<RoutineExerciseRow>,
) -> Result<Vec<Routine>, ApiError> {
    let mut exercises_by_day: HashMap<i64, Vec<RoutineExercise>> = HashMap::new();
    for row in exercises {
        exercises_by_day
            .entry(row.routine_day_id)
            .or_default()
            .push(RoutineExercise {
                id: row.id,
                exercise: Exercise {
                    id: row.exercise_id,
                    muscle_id: row.muscle_id,
                    name: row.exercise_name,
                    description: row.description,
                },
                sets: row.sets,
                reps: row.reps,
                load_kg: row.load_kg.map(from_decimal),
            });
    }

    let mut days_by_routine: HashMap<i64, Vec<RoutineDay>> = HashMap::new();
    for day in days {
        let weekday: DayOfWeek = day
            .weekday
            .parse()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Corrupt routine day {}: {}", day.id, e)))?;
        days_by_routine.entry(day.routine_id).or_default().push(RoutineDay {
            id: day.id,
            routine_id: day.routine_id,
            weekday,
            exercises: exercises_by_day.remove(&day.id).unwrap_or_default(),
        });
    }

    Ok(records
        .into_iter()
        .map(|record| {
            let mut days = days_by_routine.remove(&record.id).unwrap_or_default();
            days.sort_by_key(|day| day.weekday);
            Routine {
                id: record.id,
                name: record.name,
                created_at: record.created_at,
                days,
            }
        })
        .collect())
}
