//! Routine plan and tracker routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::RoutineService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use fitcontrol_shared::{
    ComplianceResponse, ComplianceUpdateRequest, Routine, RoutineOverview, RoutineRequest,
    RoutineTrackerResponse,
};

pub fn routine_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routines).post(create_routine))
        .route("/overview", get(overview))
        .route("/tracker/today", get(tracker_today))
        .route("/compliance/:id", put(update_compliance))
        .route("/:id", get(get_routine).put(update_routine).delete(delete_routine))
}

/// GET /api/v1/routines
async fn list_routines(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<Routine>>> {
    let routines = RoutineService::list(state.db(), auth.user_id).await?;
    Ok(Json(routines))
}

/// POST /api/v1/routines
async fn create_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RoutineRequest>,
) -> ApiResult<(StatusCode, Json<Routine>)> {
    let routine = RoutineService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(routine)))
}

/// GET /api/v1/routines/:id
async fn get_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Routine>> {
    let routine = RoutineService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(routine))
}

/// PUT /api/v1/routines/:id - full replacement
async fn update_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<RoutineRequest>,
) -> ApiResult<Json<Routine>> {
    let routine = RoutineService::update(state.db(), auth.user_id, id, req).await?;
    Ok(Json(routine))
}

/// DELETE /api/v1/routines/:id
async fn delete_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    RoutineService::delete(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/routines/overview
async fn overview(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<RoutineOverview>> {
    let overview = RoutineService::overview(state.db(), auth.user_id, state.today()).await?;
    Ok(Json(overview))
}

/// GET /api/v1/routines/tracker/today
async fn tracker_today(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<RoutineTrackerResponse>> {
    let tracker = RoutineService::tracker_today(state.db(), auth.user_id, state.today()).await?;
    Ok(Json(tracker))
}

/// PUT /api/v1/routines/compliance/:id
async fn update_compliance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<ComplianceUpdateRequest>,
) -> ApiResult<Json<ComplianceResponse>> {
    let record = RoutineService::update_compliance(state.db(), auth.user_id, id, req.completed).await?;
    Ok(Json(record))
}
