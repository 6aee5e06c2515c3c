//! Route definitions for the FitControl API
//!
//! Probes sit at the root; everything else is nested under `/api/v1`.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod catalog;
mod dashboard;
mod diet;
mod energy;
mod health;
mod profile;
mod progress;
mod routines;


pub use auth::auth_routes;
pub use catalog::catalog_routes;
pub use dashboard::dashboard_routes;
pub use diet::diet_routes;
pub use energy::energy_routes;
pub use profile::profile_routes;
pub use progress::progress_routes;
pub use routines::routine_routes;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/auth", auth_routes())
        .nest("/profile", profile_routes())
        .nest("/progress", progress_routes())
        .nest("/energy", energy_routes())
        .nest("/catalog", catalog_routes())
        .nest("/routines", routine_routes())
        .nest("/diet", diet_routes())
        .nest("/dashboard", dashboard_routes())
}

async fn api_root() -> Json<Value> {
    Json(json!({
        "name": "FitControl API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
