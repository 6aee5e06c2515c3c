//! Profile service: preferences plus the summary shown on the profile page

use crate::error::ApiError;
use crate::repositories::{from_decimal, ProgressRepository, UserRepository};
use crate::services::{DietService, RoutineService};
use chrono::NaiveDate;
use fitcontrol_shared::{ProfileResponse, UpdatePreferencesRequest, UserPreferences, WeightUnit};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ProfileService;

impl ProfileService {
    /// Preferred weight unit, falling back to kg for unreadable values
    pub async fn weight_unit(pool: &PgPool, user_id: Uuid) -> Result<WeightUnit, ApiError> {
        let settings = UserRepository::get_settings(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(parse_unit(&settings.weight_unit, user_id))
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, today: NaiveDate) -> Result<ProfileResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let weight_unit = Self::weight_unit(pool, user_id).await?;

        let current_weight_kg = ProgressRepository::find_active(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(|progress| from_decimal(progress.current_weight_kg));

        let routine_streak = RoutineService::current_streak(pool, user_id, today).await?;
        let diet_streak = DietService::current_streak(pool, user_id, today).await?;

        Ok(ProfileResponse {
            display_name: user.display_name,
            email: user.email,
            weight_unit,
            current_weight_kg,
            current_weight: current_weight_kg.map(|kg| weight_unit.display(kg, 1)),
            routine_streak,
            diet_streak,
        })
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdatePreferencesRequest,
    ) -> Result<UserPreferences, ApiError> {
        req.validate()?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let display_name = match req.display_name.as_deref().map(str::trim) {
            Some(name) if name != user.display_name => {
                UserRepository::update_display_name(pool, user_id, name)
                    .await
                    .map_err(ApiError::Internal)?;
                name.to_string()
            }
            _ => user.display_name,
        };

        let weight_unit = match req.weight_unit {
            Some(unit) => {
                let settings = UserRepository::update_weight_unit(pool, user_id, unit.abbreviation())
                    .await
                    .map_err(ApiError::Internal)?;
                parse_unit(&settings.weight_unit, user_id)
            }
            None => Self::weight_unit(pool, user_id).await?,
        };

        info!(user_id = %user_id, weight_unit = %weight_unit, "Preferences updated");
        Ok(UserPreferences {
            display_name,
            weight_unit,
        })
    }
}

fn parse_unit(value: &str, user_id: Uuid) -> WeightUnit {
    value.parse().unwrap_or_else(|_| {
        warn!(user_id = %user_id, value, "Unknown stored weight unit, using kg");
        WeightUnit::Kg
    })
}
