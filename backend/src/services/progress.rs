//! Weight-goal progress service
//!
//! A user has at most one active goal. Weights are stored in kg and the
//! response carries both kg and the preferred unit.

use crate::db::is_unique_violation;
use crate::error::ApiError;
use crate::repositories::progress::ProgressRecord;
use crate::repositories::{from_decimal, CreateProgress, ProgressRepository};
use crate::services::ProfileService;
use chrono::NaiveDate;
use fitcontrol_shared::units::round_to;
use fitcontrol_shared::validation::{field, validate_weight};
use fitcontrol_shared::{
    goal_reached, progress_percent, ActiveProgressResponse, CreateProgressRequest, GoalDirection,
    ProgressResponse, ProgressStatus, UpdateProgressRequest, WeightUnit,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct ProgressService;

impl ProgressService {
    pub async fn active(pool: &PgPool, user_id: Uuid) -> Result<ActiveProgressResponse, ApiError> {
        let weight_unit = ProfileService::weight_unit(pool, user_id).await?;
        let record = ProgressRepository::find_active(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(ActiveProgressResponse {
            progress: record.map(|r| to_response(r, weight_unit)).transpose()?,
            weight_unit,
        })
    }

    /// Start a goal at the current weight
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateProgressRequest,
        today: NaiveDate,
    ) -> Result<ProgressResponse, ApiError> {
        let weight_unit = ProfileService::weight_unit(pool, user_id).await?;
        let input_unit = req.unit.unwrap_or(weight_unit);
        let start_kg = input_unit.to_kg(req.current_weight);
        let target_kg = input_unit.to_kg(req.target_weight);

        field("current_weight", validate_weight(start_kg))?;
        field("target_weight", validate_weight(target_kg))?;

        let already_active = ProgressRepository::find_active(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .is_some();
        if already_active {
            return Err(ApiError::Conflict("An active progress goal already exists".to_string()));
        }

        let record = ProgressRepository::create(
            pool,
            CreateProgress {
                user_id,
                start_weight_kg: start_kg,
                target_weight_kg: target_kg,
                started_on: today,
            },
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("An active progress goal already exists".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        info!(
            user_id = %user_id,
            progress_id = %record.id,
            direction = GoalDirection::between(start_kg, target_kg).as_str(),
            "Progress goal started"
        );
        to_response(record, weight_unit)
    }

    /// Record a new current weight on an active goal
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: UpdateProgressRequest,
    ) -> Result<ProgressResponse, ApiError> {
        let weight_unit = ProfileService::weight_unit(pool, user_id).await?;
        let current_kg = req.unit.unwrap_or(weight_unit).to_kg(req.current_weight);
        field("current_weight", validate_weight(current_kg))?;

        Self::find_active_goal(pool, user_id, id).await?;

        let record = ProgressRepository::update_current_weight(pool, user_id, id, current_kg)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Progress goal not found".to_string()))?;

        info!(user_id = %user_id, progress_id = %id, "Progress weight updated");
        to_response(record, weight_unit)
    }

    pub async fn finish(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        today: NaiveDate,
    ) -> Result<ProgressResponse, ApiError> {
        let weight_unit = ProfileService::weight_unit(pool, user_id).await?;
        Self::find_active_goal(pool, user_id, id).await?;

        let record = ProgressRepository::finish(pool, user_id, id, today)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Conflict("Progress goal is already finished".to_string()))?;

        info!(user_id = %user_id, progress_id = %id, "Progress goal finished");
        to_response(record, weight_unit)
    }

    async fn find_active_goal(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<ProgressRecord, ApiError> {
        let record = ProgressRepository::find_by_id(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Progress goal not found".to_string()))?;

        if record.status != ProgressStatus::Active.code() {
            return Err(ApiError::Conflict("Progress goal is already finished".to_string()));
        }
        Ok(record)
    }
}

/// Build the API view of a stored goal
pub fn to_response(record: ProgressRecord, unit: WeightUnit) -> Result<ProgressResponse, ApiError> {
    let status = ProgressStatus::from_code(record.status).ok_or_else(|| {
        ApiError::Internal(anyhow::anyhow!(
            "Unknown progress status {} on goal {}",
            record.status,
            record.id
        ))
    })?;

    let start = from_decimal(record.start_weight_kg);
    let current = from_decimal(record.current_weight_kg);
    let target = from_decimal(record.target_weight_kg);
    let direction = GoalDirection::between(start, target);

    Ok(ProgressResponse {
        id: record.id.to_string(),
        start_weight_kg: start,
        current_weight_kg: current,
        target_weight_kg: target,
        start_weight: unit.display(start, 1),
        current_weight: unit.display(current, 1),
        target_weight: unit.display(target, 1),
        unit,
        direction,
        progress_percent: round_to(progress_percent(start, current, target), 1),
        goal_reached: goal_reached(current, target, direction),
        status,
        started_on: record.started_on,
        finished_on: record.finished_on,
    })
}
