//! FitControl WASM module
//!
//! Browser bindings for the shared calculators, so the client renders the
//! same streaks, calendars and conversions the API returns. Complex values
//! cross the boundary as JSON strings.

use fitcontrol_shared::{
    calculate_expenditure, EnergyExpenditure, EnergyProfile, EnergyRequest, StreakInput,
    StreakResult, WeightUnit,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Streak and 35-day calendar from a JSON `StreakInput`
///
/// `{"scheduled_weekdays": ["monday", "jueves"], "compliance": {"2024-05-06": true}, "today": "2024-05-09"}`
#[wasm_bindgen]
pub fn compute_streak(input_json: &str) -> Result<String, JsValue> {
    streak_json(input_json).map_err(|e| JsValue::from_str(&e))
}

/// Energy expenditure from a JSON energy request (weight in `unit`, kg by default)
#[wasm_bindgen]
pub fn compute_energy(input_json: &str) -> Result<String, JsValue> {
    energy_json(input_json).map_err(|e| JsValue::from_str(&e))
}

/// Convert a weight between "kg" and "lbs"
#[wasm_bindgen]
pub fn convert_weight(value: f64, from: &str, to: &str) -> Result<f64, JsValue> {
    convert(value, from, to).map_err(|e| JsValue::from_str(&e))
}

/// Share of the way from start to target weight, 0-100
#[wasm_bindgen]
pub fn goal_progress_percent(start_kg: f64, current_kg: f64, target_kg: f64) -> f64 {
    fitcontrol_shared::progress_percent(start_kg, current_kg, target_kg)
}

pub fn streak_json(input_json: &str) -> Result<String, String> {
    let input: StreakInput = serde_json::from_str(input_json).map_err(|e| e.to_string())?;
    let result: StreakResult = input.evaluate().map_err(|e| e.to_string())?;
    to_json(&result)
}

pub fn energy_json(input_json: &str) -> Result<String, String> {
    let request: EnergyRequest = serde_json::from_str(input_json).map_err(|e| e.to_string())?;
    let profile = EnergyProfile {
        sex: request.sex,
        age_years: request.age,
        height_cm: request.height_cm,
        weight_kg: request.unit.unwrap_or_default().to_kg(request.weight),
        activity_level: request.activity_level.resolve().map_err(|e| e.to_string())?,
    };
    profile.validate().map_err(|e| e.to_string())?;

    let result: EnergyExpenditure = calculate_expenditure(&profile);
    to_json(&result)
}

pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, String> {
    let from: WeightUnit = from.parse()?;
    let to: WeightUnit = to.parse()?;
    Ok(to.from_kg(from.to_kg(value)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}
