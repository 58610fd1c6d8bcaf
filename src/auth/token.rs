//! Bearer token issuing and validation

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// JWT claims carried by task API tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Signs and verifies HS256 tokens
pub struct TokenService {
    secret: String,
    ttl_minutes: i64,
}

impl TokenService {
    pub fn new(secret: String, ttl_minutes: i64) -> Self {
        Self {
            secret,
            ttl_minutes,
        }
    }

    /// Build from configuration, falling back to a random per-process secret
    pub fn from_config(secret: Option<&str>, ttl_minutes: i64) -> Self {
        let secret = match secret {
            Some(secret) if !secret.is_empty() => secret.to_string(),
            _ => {
                tracing::warn!("No JWT secret configured; tokens will not survive a restart");
                random_secret()
            }
        };
        Self::new(secret, ttl_minutes)
    }

    pub fn issue(&self, username: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let exp = self
            .ttl_minutes
            .checked_mul(60)
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                AppError::Internal(format!("Token TTL of {} minutes is out of range", self.ttl_minutes))
            })?;
        let claims = Claims {
            sub: username.to_string(),
            exp,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    pub fn validate(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Forbidden(format!("Invalid token: {}", e)))
    }
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
