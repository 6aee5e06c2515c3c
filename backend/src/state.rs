//! Application state management
//!
//! Shared resources handed to every handler through Axum's state extraction.
//! Everything here is created once at startup and cloned per request, so each
//! field is either an Arc or already cheap to clone (`PgPool`).

use crate::auth::{JwtService, TokenLifetimes};
use crate::config::AppConfig;
use chrono::NaiveDate;
use fitcontrol_shared::today_at_offset;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
}

impl AppState {
    /// Create a new application state, deriving the JWT keys from the secret
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            TokenLifetimes {
                access_secs: config.jwt.access_token_expiry_secs,
                refresh_secs: config.jwt.refresh_token_expiry_secs,
                reset_secs: config.jwt.reset_token_expiry_secs,
            },
        );

        Self {
            db,
            config: Arc::new(config),
            jwt,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Calendar date used for streaks, calendars and trackers
    pub fn today(&self) -> NaiveDate {
        today_at_offset(self.config.tracking.timezone_offset_minutes)
    }
}
