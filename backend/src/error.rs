//! Application error handling
//!
//! Converts service and domain errors into HTTP responses with a uniform
//! `{"error": {"code", "message", "field"?}}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fitcontrol_shared::{ErrorDetail, ErrorResponse, StreakError, ValidationError};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Validation failure tied to a request field
    #[error("Validation error: {0}")]
    InvalidField(#[from] ValidationError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<StreakError> for ApiError {
    fn from(err: StreakError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None),
            ApiError::InvalidField(err) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                err.message.clone(),
                Some(err.field.clone()),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = self.parts();

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[rstest]
    #[case(ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::NotFound("routine".into()), StatusCode::NOT_FOUND)]
    #[case(ApiError::Unauthorized("token".into()), StatusCode::UNAUTHORIZED)]
    #[case(ApiError::Forbidden("nope".into()), StatusCode::FORBIDDEN)]
    #[case(ApiError::Conflict("dup".into()), StatusCode::CONFLICT)]
    #[case(ApiError::Internal(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] error: ApiError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[tokio::test]
    async fn test_field_error_body() {
        let error: ApiError = ValidationError::new("target_weight", "Weight must be at least 20 kg").into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "target_weight");
    }

    #[tokio::test]
    async fn test_streak_error_is_validation() {
        let error: ApiError = StreakError::InvalidWeekday("funday".to_string()).into();
        let body = body_json(error.into_response()).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"].get("field").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let error = ApiError::Internal(anyhow::anyhow!("connection string leaked"));
        let body = body_json(error.into_response()).await;
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }
}
