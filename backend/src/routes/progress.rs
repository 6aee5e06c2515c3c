//! Weight-goal progress routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProgressService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use fitcontrol_shared::{
    ActiveProgressResponse, CreateProgressRequest, ProgressResponse, UpdateProgressRequest,
};
use uuid::Uuid;

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_progress))
        .route("/active", get(get_active))
        .route("/:id", put(update_progress))
        .route("/:id/finish", post(finish_progress))
}

/// GET /api/v1/progress/active
async fn get_active(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ActiveProgressResponse>> {
    let active = ProgressService::active(state.db(), auth.user_id).await?;
    Ok(Json(active))
}

/// POST /api/v1/progress
async fn create_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProgressRequest>,
) -> ApiResult<(StatusCode, Json<ProgressResponse>)> {
    let progress = ProgressService::create(state.db(), auth.user_id, req, state.today()).await?;
    Ok((StatusCode::CREATED, Json(progress)))
}

/// PUT /api/v1/progress/:id
async fn update_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProgressRequest>,
) -> ApiResult<Json<ProgressResponse>> {
    let progress = ProgressService::update(state.db(), auth.user_id, id, req).await?;
    Ok(Json(progress))
}

/// POST /api/v1/progress/:id/finish
async fn finish_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProgressResponse>> {
    let progress = ProgressService::finish(state.db(), auth.user_id, id, state.today()).await?;
    Ok(Json(progress))
}
