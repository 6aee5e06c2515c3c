//! Home dashboard summary

use crate::error::ApiError;
use crate::repositories::{from_decimal, ProgressRepository, UserRepository};
use crate::services::{DietService, ProfileService, RoutineService};
use chrono::NaiveDate;
use fitcontrol_shared::DashboardResponse;
use sqlx::PgPool;
use uuid::Uuid;

pub struct DashboardService;

impl DashboardService {
    pub async fn summary(pool: &PgPool, user_id: Uuid, today: NaiveDate) -> Result<DashboardResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let weight_unit = ProfileService::weight_unit(pool, user_id).await?;

        let progress = ProgressRepository::find_active(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let routine_streak = RoutineService::current_streak(pool, user_id, today).await?;
        let diet_streak = DietService::current_streak(pool, user_id, today).await?;

        Ok(DashboardResponse {
            display_name: user.display_name,
            routine_streak,
            diet_streak,
            current_weight: progress
                .as_ref()
                .map(|p| weight_unit.display(from_decimal(p.current_weight_kg), 1)),
            target_weight: progress
                .as_ref()
                .map(|p| weight_unit.display(from_decimal(p.target_weight_kg), 1)),
            weight_unit,
        })
    }
}
