//! Account service: registration, login, token refresh and password reset
//!
//! Password hashing and verification run on the blocking pool; JWT signing
//! uses the keys precomputed in AppState.

use crate::auth::{JwtService, PasswordService};
use crate::db::is_unique_violation;
use crate::error::ApiError;
use crate::repositories::UserRepository;
use fitcontrol_shared::validation::{field, validate_password};
use fitcontrol_shared::{
    AuthTokens, LoginRequest, PasswordResetResponse, PasswordUpdateRequest, RegisterRequest,
    UserProfile, ValidationError,
};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;
use validator::ValidateEmail;

const RESET_ACCEPTED_MESSAGE: &str =
    "If an account exists for that email, password reset instructions have been issued";

/// Emails are matched case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserService;

impl UserService {
    pub async fn register(
        pool: &PgPool,
        jwt: &JwtService,
        req: RegisterRequest,
    ) -> Result<AuthTokens, ApiError> {
        let req = RegisterRequest {
            email: normalize_email(&req.email),
            display_name: req.display_name.trim().to_string(),
            ..req
        };
        req.validate()?;

        if UserRepository::email_exists(pool, &req.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        // A concurrent registration can still win the race past the exists check
        let user = UserRepository::create(pool, &req.email, &password_hash, &req.display_name)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict("Email already registered".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?;

        info!(user_id = %user.id, "User registered");
        issue_tokens(jwt, user.id)
    }

    pub async fn login(
        pool: &PgPool,
        jwt: &JwtService,
        req: LoginRequest,
    ) -> Result<AuthTokens, ApiError> {
        let user = UserRepository::find_by_email(pool, &normalize_email(&req.email))
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordService::verify_async(req.password, user.password_hash)
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            debug!(user_id = %user.id, "Rejected login with wrong password");
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        issue_tokens(jwt, user.id)
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(
        pool: &PgPool,
        jwt: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        issue_tokens(jwt, user_id)
    }

    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserProfile {
            id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
            created_at: user.created_at,
        })
    }

    /// Start a password reset
    ///
    /// The answer never reveals whether the account exists. When
    /// `expose_token` is set the reset token is returned in the body, since
    /// there is no mail delivery to carry it.
    pub async fn request_password_reset(
        pool: &PgPool,
        jwt: &JwtService,
        email: &str,
        expose_token: bool,
    ) -> Result<PasswordResetResponse, ApiError> {
        let email = normalize_email(email);
        if !email.validate_email() {
            return Err(ValidationError::new("email", "Invalid email format").into());
        }

        let user = UserRepository::find_by_email(pool, &email)
            .await
            .map_err(ApiError::Internal)?;

        let reset_token = match user {
            Some(user) => {
                let token = jwt.generate_reset_token(user.id).map_err(ApiError::Internal)?;
                info!(user_id = %user.id, "Password reset token issued");
                expose_token.then_some(token)
            }
            None => None,
        };

        Ok(PasswordResetResponse {
            message: RESET_ACCEPTED_MESSAGE.to_string(),
            reset_token,
        })
    }

    /// Set a new password using a reset token
    pub async fn update_password(
        pool: &PgPool,
        jwt: &JwtService,
        req: PasswordUpdateRequest,
    ) -> Result<(), ApiError> {
        field("new_password", validate_password(&req.new_password))?;

        let claims = jwt
            .validate_reset_token(&req.reset_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid reset token: {}", e)))?;
        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        let password_hash = PasswordService::hash_async(req.new_password)
            .await
            .map_err(ApiError::Internal)?;

        let updated = UserRepository::update_password(pool, user_id, &password_hash)
            .await
            .map_err(ApiError::Internal)?;
        if !updated {
            return Err(ApiError::Unauthorized("User not found".to_string()));
        }

        info!(user_id = %user_id, "Password updated");
        Ok(())
    }
}

fn issue_tokens(jwt: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
    Ok(AuthTokens {
        access_token: jwt.generate_access_token(user_id).map_err(ApiError::Internal)?,
        refresh_token: jwt.generate_refresh_token(user_id).map_err(ApiError::Internal)?,
        token_type: "Bearer".to_string(),
        expires_in: jwt.access_token_expiry_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenLifetimes;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn test_issued_tokens_validate() {
        let jwt = JwtService::new(
            "unit-test-secret",
            TokenLifetimes {
                access_secs: 60,
                refresh_secs: 120,
                reset_secs: 30,
            },
        );
        let user_id = Uuid::new_v4();
        let tokens = issue_tokens(&jwt, user_id).unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 60);
        let claims = jwt.validate_refresh_token(&tokens.refresh_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
    }
}
