//! Profile and preference routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use fitcontrol_shared::{ProfileResponse, UpdatePreferencesRequest, UserPreferences};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_preferences))
}

/// GET /api/v1/profile
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ProfileResponse>> {
    let profile = ProfileService::get(state.db(), auth.user_id, state.today()).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile - display name and/or weight unit
async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdatePreferencesRequest>,
) -> ApiResult<Json<UserPreferences>> {
    let preferences = ProfileService::update(state.db(), auth.user_id, req).await?;
    Ok(Json(preferences))
}
