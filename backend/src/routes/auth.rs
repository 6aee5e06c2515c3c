//! Authentication routes
//!
//! Registration, login, token refresh, the current account and the
//! password-reset flow. JWT keys come precomputed from AppState and password
//! hashing runs on the blocking pool.

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fitcontrol_shared::{
    AuthTokens, LoginRequest, MessageResponse, PasswordResetRequest, PasswordResetResponse,
    PasswordUpdateRequest, RefreshRequest, RegisterRequest, UserProfile,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/me", get(get_profile))
        .route("/password/reset", post(request_password_reset))
        .route("/password/update", post(update_password))
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthTokens>)> {
    let tokens = UserService::register(state.db(), state.jwt(), req).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::login(state.db(), state.jwt(), req).await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::refresh_token(state.db(), state.jwt(), &req.refresh_token).await?;
    Ok(Json(tokens))
}

/// GET /api/v1/auth/me
async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::get_profile(state.db(), auth_user.user_id).await?;
    Ok(Json(profile))
}

/// POST /api/v1/auth/password/reset
///
/// Always 202. The token is only echoed back outside production since
/// nothing delivers it by mail.
async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> ApiResult<(StatusCode, Json<PasswordResetResponse>)> {
    let response = UserService::request_password_reset(
        state.db(),
        state.jwt(),
        &req.email,
        !AppConfig::is_production(),
    )
    .await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// POST /api/v1/auth/password/update
async fn update_password(
    State(state): State<AppState>,
    Json(req): Json<PasswordUpdateRequest>,
) -> ApiResult<Json<MessageResponse>> {
    UserService::update_password(state.db(), state.jwt(), req).await?;
    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}
