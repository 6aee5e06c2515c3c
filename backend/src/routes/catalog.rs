//! Read-only exercise catalog routes
//!
//! The catalog is seeded by migration, so these handlers go straight to the
//! repository.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::CatalogRepository;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use fitcontrol_shared::{Exercise, Muscle, MuscleGroup};
use serde::Deserialize;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/muscle-groups", get(list_muscle_groups))
        .route("/muscle-groups/:id/muscles", get(list_group_muscles))
        .route("/muscles", get(list_muscles))
        .route("/muscles/:id/exercises", get(list_muscle_exercises))
        .route("/exercises/:id", get(get_exercise))
}

#[derive(Debug, Default, Deserialize)]
pub struct MuscleQuery {
    pub group_id: Option<i64>,
}

/// GET /api/v1/catalog/muscle-groups
async fn list_muscle_groups(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Json<Vec<MuscleGroup>>> {
    let groups = CatalogRepository::muscle_groups(state.db())
        .await
        .map_err(ApiError::Internal)?;
    Ok(Json(groups.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/catalog/muscle-groups/:id/muscles
async fn list_group_muscles(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(group_id): Path<i64>,
) -> ApiResult<Json<Vec<Muscle>>> {
    let exists = CatalogRepository::muscle_group_exists(state.db(), group_id)
        .await
        .map_err(ApiError::Internal)?;
    if !exists {
        return Err(ApiError::NotFound("Muscle group not found".to_string()));
    }

    let muscles = CatalogRepository::muscles(state.db(), Some(group_id))
        .await
        .map_err(ApiError::Internal)?;
    Ok(Json(muscles.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/catalog/muscles?group_id=
async fn list_muscles(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<MuscleQuery>,
) -> ApiResult<Json<Vec<Muscle>>> {
    let muscles = CatalogRepository::muscles(state.db(), query.group_id)
        .await
        .map_err(ApiError::Internal)?;
    Ok(Json(muscles.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/catalog/muscles/:id/exercises
async fn list_muscle_exercises(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(muscle_id): Path<i64>,
) -> ApiResult<Json<Vec<Exercise>>> {
    let exists = CatalogRepository::muscle_exists(state.db(), muscle_id)
        .await
        .map_err(ApiError::Internal)?;
    if !exists {
        return Err(ApiError::NotFound("Muscle not found".to_string()));
    }

    let exercises = CatalogRepository::exercises_for_muscle(state.db(), muscle_id)
        .await
        .map_err(ApiError::Internal)?;
    Ok(Json(exercises.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/catalog/exercises/:id
async fn get_exercise(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Exercise>> {
    let exercise = CatalogRepository::exercise(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;
    Ok(Json(exercise.into()))
}
