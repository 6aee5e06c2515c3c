//! Diet plan and tracker routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::DietService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use fitcontrol_shared::{
    AddFoodRequest, ComplianceResponse, ComplianceUpdateRequest, DietOverview,
    DietTrackerResponse, FoodItem, UpdateFoodRequest,
};

pub fn diet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(overview))
        .route("/foods", post(add_food))
        .route("/foods/:id", put(update_food).delete(delete_food))
        .route("/tracker/today", get(tracker_today))
        .route("/compliance/meals/:id", put(update_meal_compliance))
        .route("/compliance/days/:id", put(update_day_compliance))
}

/// GET /api/v1/diet
async fn overview(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<DietOverview>> {
    let overview = DietService::overview(state.db(), auth.user_id, state.today()).await?;
    Ok(Json(overview))
}

/// POST /api/v1/diet/foods
async fn add_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AddFoodRequest>,
) -> ApiResult<(StatusCode, Json<FoodItem>)> {
    let food = DietService::add_food(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

/// PUT /api/v1/diet/foods/:id - partial update
async fn update_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFoodRequest>,
) -> ApiResult<Json<FoodItem>> {
    let food = DietService::update_food(state.db(), auth.user_id, id, req).await?;
    Ok(Json(food))
}

/// DELETE /api/v1/diet/foods/:id
async fn delete_food(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    DietService::delete_food(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/diet/tracker/today
async fn tracker_today(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DietTrackerResponse>> {
    let tracker = DietService::tracker_today(state.db(), auth.user_id, state.today()).await?;
    Ok(Json(tracker))
}

/// PUT /api/v1/diet/compliance/meals/:id
async fn update_meal_compliance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<ComplianceUpdateRequest>,
) -> ApiResult<Json<ComplianceResponse>> {
    let record = DietService::update_meal_compliance(state.db(), auth.user_id, id, req.completed).await?;
    Ok(Json(record))
}

/// PUT /api/v1/diet/compliance/days/:id
async fn update_day_compliance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<ComplianceUpdateRequest>,
) -> ApiResult<Json<ComplianceResponse>> {
    let record = DietService::update_day_compliance(state.db(), auth.user_id, id, req.completed).await?;
    Ok(Json(record))
}
