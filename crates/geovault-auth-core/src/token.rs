//! Signed, time-bounded bearer tokens

use chrono::{DateTime, Utc};
use geovault_types::{AccessToken, Subject};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ensure_hmac;
use crate::{AuthConfig, AuthError, Clock};

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id as a string)
    pub sub: String,
    /// Expiration timestamp (UTC seconds)
    pub exp: i64,
    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// A freshly issued token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub subject: Subject,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Bearer response handed to the client
    pub fn into_access_token(self) -> AccessToken {
        AccessToken::bearer(self.token, self.expires_at)
    }
}

/// Issues and verifies access tokens.
///
/// A token is accepted while `now < exp + leeway`, with `now` taken from the
/// injected [`Clock`]. Only the configured algorithm is accepted, and both
/// `sub` and `exp` must be present.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    leeway_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        ensure_hmac(config.jwt_algorithm)?;

        let mut validation = Validation::new(config.jwt_algorithm);
        // expiry is checked against the injected clock instead
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            algorithm: config.jwt_algorithm,
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            validation,
            default_ttl: config.access_token_expires,
            leeway_secs: duration_secs(config.leeway)?,
            clock,
        })
    }

    /// Issue a token with the configured lifetime
    pub fn issue(&self, subject: &Subject) -> Result<IssuedToken, AuthError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issue a token expiring `ttl` from now.
    ///
    /// `iat` and `exp` are whole seconds, truncated from the clock. With a
    /// sub-second clock the token is rejected up to one second before
    /// `issued_at + ttl`; `expires_at` reports the truncated instant.
    pub fn issue_with_ttl(&self, subject: &Subject, ttl: Duration) -> Result<IssuedToken, AuthError> {
        let now = self.clock.now();
        let iat = now.timestamp();
        let exp = iat
            .checked_add(duration_secs(ttl)?)
            .ok_or_else(|| AuthError::Configuration("token ttl out of range".to_string()))?;
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AuthError::Configuration("token ttl out of range".to_string()))?;

        let claims = Claims {
            sub: subject.as_str().to_string(),
            exp,
            iat: Some(iat),
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            AuthError::Internal("failed to sign token".to_string())
        })?;

        Ok(IssuedToken {
            token,
            subject: subject.clone(),
            issued_at: now,
            expires_at,
        })
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str) -> Result<Subject, AuthError> {
        self.verify_claims(token).map(|claims| Subject::new(claims.sub))
    }

    /// Verify a token and return all of its claims
    pub fn verify_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token rejected as invalid: {}", e);
                AuthError::TokenInvalid
            })?
            .claims;

        if claims.sub.is_empty() {
            tracing::debug!("Token rejected as invalid: empty subject");
            return Err(AuthError::TokenInvalid);
        }

        let now = self.clock.now().timestamp();
        if now >= claims.exp.saturating_add(self.leeway_secs) {
            tracing::debug!(exp = claims.exp, now, "Token rejected as expired");
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("default_ttl", &self.default_ttl)
            .field("leeway_secs", &self.leeway_secs)
            .finish_non_exhaustive()
    }
}

fn duration_secs(duration: Duration) -> Result<i64, AuthError> {
    i64::try_from(duration.as_secs())
        .map_err(|_| AuthError::Configuration(format!("duration out of range: {duration:?}")))
}
