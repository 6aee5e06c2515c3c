//! Energy expenditure routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::EnergyService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use fitcontrol_shared::{EnergyRequest, EnergyResponse};

pub fn energy_routes() -> Router<AppState> {
    Router::new().route("/", get(get_energy).post(calculate_energy))
}

/// GET /api/v1/energy - last stored calculation, 404 if none
async fn get_energy(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<EnergyResponse>> {
    let energy = EnergyService::get(state.db(), auth.user_id).await?;
    Ok(Json(energy))
}

/// POST /api/v1/energy
async fn calculate_energy(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<EnergyRequest>,
) -> ApiResult<Json<EnergyResponse>> {
    let energy = EnergyService::calculate(state.db(), auth.user_id, req).await?;
    Ok(Json(energy))
}
