use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::DashboardService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use fitcontrol_shared::DashboardResponse;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// GET /api/v1/dashboard
async fn get_dashboard(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<DashboardResponse>> {
    let summary = DashboardService::summary(state.db(), auth.user_id, state.today()).await?;
    Ok(Json(summary))
}
