//! JWT token generation and validation
//!
//! Access, refresh and password-reset tokens share one HS256 key pair that is
//! derived once at startup.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Purpose a token was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
    Reset,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
            TokenType::Reset => "reset",
        };
        f.write_str(name)
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub token_type: TokenType,
    pub jti: String,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow::anyhow!("Invalid subject: {}", e))
    }
}

/// Pre-computed JWT keys, cached in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Token lifetimes in seconds
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access_secs: i64,
    pub refresh_secs: i64,
    pub reset_secs: i64,
}

impl TokenLifetimes {
    fn for_type(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Access => self.access_secs,
            TokenType::Refresh => self.refresh_secs,
            TokenType::Reset => self.reset_secs,
        }
    }
}

/// JWT service for token operations
///
/// Create once at startup and store in AppState; cloning only bumps the Arcs.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    lifetimes: TokenLifetimes,
}

impl JwtService {
    pub fn new(secret: &str, lifetimes: TokenLifetimes) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            lifetimes,
        }
    }

    #[inline]
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        self.generate_token(user_id, TokenType::Access)
    }

    #[inline]
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        self.generate_token(user_id, TokenType::Refresh)
    }

    /// Short-lived token that authorizes a single password change
    #[inline]
    pub fn generate_reset_token(&self, user_id: Uuid) -> Result<String> {
        self.generate_token(user_id, TokenType::Reset)
    }

    fn generate_token(&self, user_id: Uuid, token_type: TokenType) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetimes.for_type(token_type));

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate {} token: {}", token_type, e))
    }

    /// Validate signature and expiry, returning the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Validate a token and require a specific purpose
    pub fn validate_typed(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(anyhow::anyhow!("Not an {} token", expected));
        }
        Ok(claims)
    }

    #[inline]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        self.validate_typed(token, TokenType::Access)
    }

    #[inline]
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        self.validate_typed(token, TokenType::Refresh)
    }

    #[inline]
    pub fn validate_reset_token(&self, token: &str) -> Result<Claims> {
        self.validate_typed(token, TokenType::Reset)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.lifetimes.access_secs
    }
}
