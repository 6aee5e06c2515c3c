//! Liveness and readiness probes
//!
//! `/health` and `/health/live` answer as long as the process runs;
//! `/health/ready` also pings PostgreSQL and answers 503 when it is down.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::time::Instant;

const SERVICE_NAME: &str = "fitcontrol";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseCheck>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    pub healthy: bool,
    pub latency_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            database: None,
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive"))
}

pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let result = db::health_check(state.db()).await;
    let latency_ms = started.elapsed().as_millis();

    let (status, code, database) = match result {
        Ok(()) => (
            "ready",
            StatusCode::OK,
            DatabaseCheck {
                healthy: true,
                latency_ms,
                error: None,
            },
        ),
        Err(e) => (
            "not_ready",
            StatusCode::SERVICE_UNAVAILABLE,
            DatabaseCheck {
                healthy: false,
                latency_ms,
                error: Some(e.to_string()),
            },
        ),
    };

    let mut response = HealthResponse::new(status);
    response.database = Some(database);
    (code, Json(response))
}
