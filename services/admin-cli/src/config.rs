//! Configuration for the admin CLI.

use geovault_auth_core::{AuthConfig, DEFAULT_ACCESS_TOKEN_EXPIRES};
use std::time::Duration;

/// Admin CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL (`postgres://…` or `sqlite:…`)
    pub database_url: Option<String>,

    /// Token configuration, present when `SECRET_KEY` is set
    pub auth: Option<AuthConfig>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let auth = match lookup("SECRET_KEY") {
            Some(secret) => Some(auth_config(&secret, &lookup)?),
            None => None,
        };

        Ok(Self { database_url, auth })
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }

    pub fn auth(&self) -> Result<&AuthConfig, ConfigError> {
        self.auth.as_ref().ok_or(ConfigError::Missing("SECRET_KEY"))
    }
}

fn auth_config(
    secret: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<AuthConfig, ConfigError> {
    let algorithm = lookup("JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string());

    // Token lifetime (default 60 minutes)
    let expire_minutes: u64 = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_EXPIRE_MINUTES"))?,
        None => DEFAULT_ACCESS_TOKEN_EXPIRES.as_secs() / 60,
    };

    let expire_secs = expire_minutes
        .checked_mul(60)
        .ok_or(ConfigError::Invalid("ACCESS_TOKEN_EXPIRE_MINUTES"))?;

    let leeway_secs: u64 = match lookup("TOKEN_LEEWAY_SECS") {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("TOKEN_LEEWAY_SECS"))?,
        None => 0,
    };

    let auth = AuthConfig::try_new(secret, &algorithm)
        .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
        .with_access_token_expires(Duration::from_secs(expire_secs))
        .with_leeway(Duration::from_secs(leeway_secs));

    Ok(auth)
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
