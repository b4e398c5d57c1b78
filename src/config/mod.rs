//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite database path or `sqlite:` URL
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub database_max_connections: u32,

    /// JWT secret for signing and verifying auth tokens
    pub jwt_secret: String,

    /// Auth token lifetime in seconds
    pub token_lifetime_secs: i64,

    /// Bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Prefer DATABASE_PATH, fall back to DATABASE_URL
        let database_url = env::var("DATABASE_PATH")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "./data/bookshelf.db".to_string());

        let jwt_secret = resolve_jwt_secret(env::var("JWT_SECRET").ok());

        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            jwt_secret,

            token_lifetime_secs: env::var("TOKEN_LIFETIME_SECS")
                .unwrap_or_else(|_| "7200".to_string())
                .parse()
                .context("Invalid TOKEN_LIFETIME_SECS")?,

            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
        })
    }
}

/// Pick the token signing secret. A missing or blank value gets a random
/// development secret; an empty HS256 key would accept forged tokens.
fn resolve_jwt_secret(raw: Option<String>) -> String {
    match raw.as_deref().map(str::trim) {
        Some(secret) if !secret.is_empty() => secret.to_string(),
        _ => {
            tracing::warn!("JWT_SECRET not set, generating a development secret");
            format!("dev-secret-{}", uuid::Uuid::new_v4().simple())
        }
    }
}
