//! Configuration types for auth service

use jsonwebtoken::Algorithm;
use std::time::Duration;

use crate::{AuthError, SecretKey};

/// Default token lifetime
pub const DEFAULT_ACCESS_TOKEN_EXPIRES: Duration = Duration::from_secs(60 * 60);

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret used to sign and verify tokens
    pub secret_key: SecretKey,
    /// Token signing algorithm (HMAC family only)
    pub jwt_algorithm: Algorithm,
    /// Default token lifetime
    pub access_token_expires: Duration,
    /// Grace window past `exp` during which a token is still accepted
    pub leeway: Duration,
    /// Password hashing cost parameters
    pub password: PasswordConfig,
}

impl AuthConfig {
    /// Create a config with HS256, a one hour ttl and no leeway
    pub fn new(secret_key: SecretKey) -> Self {
        Self {
            secret_key,
            jwt_algorithm: Algorithm::HS256,
            access_token_expires: DEFAULT_ACCESS_TOKEN_EXPIRES,
            leeway: Duration::ZERO,
            password: PasswordConfig::default(),
        }
    }

    /// Create a config from a raw secret and an algorithm name such as `HS256`
    pub fn try_new(secret: impl AsRef<[u8]>, algorithm: &str) -> Result<Self, AuthError> {
        let mut config = Self::new(SecretKey::new(secret)?);
        config.jwt_algorithm = parse_algorithm(algorithm)?;
        Ok(config)
    }

    /// Set default token lifetime
    pub fn with_access_token_expires(mut self, ttl: Duration) -> Self {
        self.access_token_expires = ttl;
        self
    }

    /// Set expiry leeway
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Set password hashing parameters
    pub fn with_password_config(mut self, password: PasswordConfig) -> Self {
        self.password = password;
        self
    }
}

/// Parse a signing algorithm name, accepting only symmetric HMAC algorithms
pub fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    let algorithm: Algorithm = name
        .trim()
        .parse()
        .map_err(|_| AuthError::Configuration(format!("unknown JWT algorithm: {name}")))?;
    ensure_hmac(algorithm)?;
    Ok(algorithm)
}

pub(crate) fn ensure_hmac(algorithm: Algorithm) -> Result<(), AuthError> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(()),
        other => Err(AuthError::Configuration(format!(
            "JWT algorithm {other:?} needs an asymmetric key; only HS256, HS384 and HS512 are supported"
        ))),
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}
