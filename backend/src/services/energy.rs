//! Energy expenditure service

use crate::error::ApiError;
use crate::repositories::energy::EnergyRecord;
use crate::repositories::{from_decimal, EnergyRepository, UpsertEnergy};
use crate::services::ProfileService;
use fitcontrol_shared::{
    calculate_expenditure, ActivityLevel, BiologicalSex, EnergyProfile, EnergyRequest,
    EnergyResponse, WeightUnit,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct EnergyService;

impl EnergyService {
    /// Last stored calculation
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<EnergyResponse, ApiError> {
        let record = EnergyRepository::find(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("No energy calculation yet".to_string()))?;
        let unit = ProfileService::weight_unit(pool, user_id).await?;

        to_response(record, unit)
    }

    /// Compute and store BMR, maintenance, deficit/surplus and ideal weight
    pub async fn calculate(pool: &PgPool, user_id: Uuid, req: EnergyRequest) -> Result<EnergyResponse, ApiError> {
        let unit = ProfileService::weight_unit(pool, user_id).await?;
        let profile = EnergyProfile {
            sex: req.sex,
            age_years: req.age,
            height_cm: req.height_cm,
            weight_kg: req.unit.unwrap_or(unit).to_kg(req.weight),
            activity_level: req.activity_level.resolve()?,
        };
        profile.validate()?;

        let result = calculate_expenditure(&profile);

        let record = EnergyRepository::upsert(
            pool,
            UpsertEnergy {
                user_id,
                sex: profile.sex.as_str().to_string(),
                age: profile.age_years as i32,
                height_cm: profile.height_cm,
                weight_kg: profile.weight_kg,
                activity_level: profile.activity_level.as_str().to_string(),
                bmr: result.bmr,
                maintenance_calories: result.maintenance_calories,
                deficit_calories: result.deficit_calories,
                surplus_calories: result.surplus_calories,
                ideal_weight_kg: result.ideal_weight_kg,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(
            user_id = %user_id,
            maintenance = result.maintenance_calories,
            activity_level = profile.activity_level.as_str(),
            "Energy expenditure calculated"
        );
        to_response(record, unit)
    }
}

fn to_response(record: EnergyRecord, unit: WeightUnit) -> Result<EnergyResponse, ApiError> {
    let corrupt = |what: &str, value: &str| {
        ApiError::Internal(anyhow::anyhow!("Stored energy row has invalid {}: {}", what, value))
    };

    let sex: BiologicalSex = record.sex.parse().map_err(|_| corrupt("sex", &record.sex))?;
    let activity_level: ActivityLevel = record
        .activity_level
        .parse()
        .map_err(|_| corrupt("activity level", &record.activity_level))?;
    let age = u32::try_from(record.age).map_err(|_| corrupt("age", &record.age.to_string()))?;

    let weight_kg = from_decimal(record.weight_kg);
    let ideal_weight_kg = from_decimal(record.ideal_weight_kg);

    Ok(EnergyResponse {
        sex,
        age,
        height_cm: from_decimal(record.height_cm),
        weight_kg,
        weight: unit.display(weight_kg, 1),
        unit,
        activity_level,
        activity_multiplier: activity_level.multiplier(),
        bmr: from_decimal(record.bmr),
        maintenance_calories: record.maintenance_calories,
        deficit_calories: record.deficit_calories,
        surplus_calories: record.surplus_calories,
        ideal_weight_kg,
        ideal_weight: unit.display(ideal_weight_kg, 1),
        calculated_at: record.calculated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn record(sex: &str, activity: &str) -> EnergyRecord {
        EnergyRecord {
            user_id: Uuid::nil(),
            sex: sex.to_string(),
            age: 30,
            height_cm: Decimal::new(180, 0),
            weight_kg: Decimal::new(80, 0),
            activity_level: activity.to_string(),
            bmr: Decimal::new(17800, 1),
            maintenance_calories: 2759,
            deficit_calories: 2259,
            surplus_calories: 3259,
            ideal_weight_kg: Decimal::new(7461, 2),
            calculated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_in_pounds() {
        let response = to_response(record("male", "moderately_active"), WeightUnit::Lbs).unwrap();
        assert_eq!(response.sex, BiologicalSex::Male);
        assert_eq!(response.activity_level, ActivityLevel::ModeratelyActive);
        assert_eq!(response.weight, 176.4);
        assert_eq!(response.weight_kg, 80.0);
        assert_eq!(response.bmr, 1780.0);
    }

    #[test]
    fn test_corrupt_row_is_internal_error() {
        let result = to_response(record("robot", "sedentary"), WeightUnit::Kg);
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }
}
