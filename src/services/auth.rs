//! Authentication service for password hashing and JWT handling
//!
//! Provides:
//! - Password hashing with bcrypt
//! - Access token generation and validation (HS256)
//! - The [`AuthUser`] identity that a verified token resolves to

use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use bcrypt::hash;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::UserRecord;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims structure for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID (subject)
    pub sub: String,
    pub username: String,
    pub email: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Caller identity resolved from a verified token.
///
/// Built once per request by the HTTP layer and handed explicitly to every
/// identity-scoped operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub token_lifetime: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime: config.token_lifetime_secs,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    /// Hash checked against when a login names an unknown email, so that
    /// failure path costs the same as a wrong password.
    dummy_hash: Arc<str>,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Result<Self> {
        if config.jwt_secret.trim().is_empty() {
            bail!("JWT secret must not be empty");
        }

        let dummy_hash = hash("bookshelf-dummy-password", config.bcrypt_cost)
            .map_err(|e| anyhow!("Failed to hash password: {}", e))?;

        Ok(Self {
            config,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash a password with bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash(password, self.config.bcrypt_cost)
            .map_err(|e| anyhow!("Failed to hash password: {}", e))
    }

    /// Burn one bcrypt verification without a real user
    pub fn verify_dummy_password(&self, password: &str) {
        let _ = bcrypt::verify(password, &self.dummy_hash);
    }

    /// Issue a signed access token bound to a user
    pub fn issue_token(&self, user: &UserRecord) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_lifetime);

        let claims = AccessTokenClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| anyhow!("Failed to create access token: {}", e))
    }

    /// Verify a token's signature and expiry and extract the identity
    pub fn verify_token(&self, token: &str) -> Result<AuthUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| anyhow!("Invalid access token: {}", e))?;

        Ok(AuthUser {
            user_id: token_data.claims.sub,
            username: token_data.claims.username,
            email: token_data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite_helpers::now_iso8601;

    fn service(secret: &str, lifetime: i64) -> AuthService {
        AuthService::new(AuthConfig {
            jwt_secret: secret.to_string(),
            token_lifetime: lifetime,
            bcrypt_cost: 4,
        })
        .unwrap()
    }

    fn user() -> UserRecord {
        UserRecord {
            id: "7f1c1f5e-0000-4000-8000-000000000001".into(),
            username: "reader".into(),
            email: "reader@example.com".into(),
            password_hash: String::new(),
            created_at: now_iso8601(),
            updated_at: now_iso8601(),
        }
    }

    #[test]
    fn test_issued_token_verifies() {
        let auth = service("secret", 3600);
        let token = auth.issue_token(&user()).unwrap();

        let identity = auth.verify_token(&token).unwrap();
        assert_eq!(identity.user_id, user().id);
        assert_eq!(identity.email, "reader@example.com");
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = service("secret-a", 3600).issue_token(&user()).unwrap();
        assert!(service("secret-b", 3600).verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s validation leeway
        let auth = service("secret", -600);
        let token = auth.issue_token(&user()).unwrap();
        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_empty_secret_refused() {
        let result = AuthService::new(AuthConfig {
            jwt_secret: "  ".into(),
            token_lifetime: 3600,
            bcrypt_cost: 4,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_token_signed_with_empty_key_rejected() {
        let claims = AccessTokenClaims {
            sub: "victim-id".into(),
            username: "victim".into(),
            email: "victim@example.com".into(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b""),
        )
        .unwrap();

        assert!(service("secret", 3600).verify_token(&forged).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(service("secret", 3600).verify_token("not.a.jwt").is_err());
    }

    #[test]
    fn test_hash_password_is_salted() {
        let auth = service("secret", 3600);
        let a = auth.hash_password("hunter22").unwrap();
        let b = auth.hash_password("hunter22").unwrap();
        assert_ne!(a, b);
        assert!(bcrypt::verify("hunter22", &a).unwrap());
    }
}
