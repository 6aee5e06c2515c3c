//! User and preference persistence

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User settings record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSettingsRecord {
    pub user_id: Uuid,
    pub weight_unit: String,
    pub updated_at: DateTime<Utc>,
}

pub struct UserRepository;

impl UserRepository {
    /// Create a new user together with default settings
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> Result<UserRecord> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, password_hash, display_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, display_name, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_settings (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, display_name, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, display_name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Replace the password hash; returns false when the user no longer exists
    pub async fn update_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_display_name(pool: &PgPool, id: Uuid, display_name: &str) -> Result<()> {
        sqlx::query("UPDATE users SET display_name = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(display_name)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Settings row, created on the fly for accounts that predate it
    pub async fn get_settings(pool: &PgPool, user_id: Uuid) -> Result<UserSettingsRecord> {
        let settings = sqlx::query_as::<_, UserSettingsRecord>(
            r#"
            INSERT INTO user_settings (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING user_id, weight_unit, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(settings)
    }

    pub async fn update_weight_unit(
        pool: &PgPool,
        user_id: Uuid,
        weight_unit: &str,
    ) -> Result<UserSettingsRecord> {
        let settings = sqlx::query_as::<_, UserSettingsRecord>(
            r#"
            INSERT INTO user_settings (user_id, weight_unit)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET weight_unit = EXCLUDED.weight_unit, updated_at = NOW()
            RETURNING user_id, weight_unit, updated_at
            "#,
        )
        .bind(user_id)
        .bind(weight_unit)
        .fetch_one(pool)
        .await?;

        Ok(settings)
    }
}
