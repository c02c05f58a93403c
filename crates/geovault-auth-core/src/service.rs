//! Auth service - ties together password hashing, tokens and the user store

use geovault_db::{CreateUser, UserRepository, UserRow};
use geovault_types::{normalize_email, AccessToken, Subject, UserId};
use std::sync::Arc;

use crate::{AuthConfig, AuthError, Clock, PasswordHasher, SystemClock, TokenService};

/// Authentication service
///
/// Provides a unified interface for:
/// - Account registration with hashed credentials
/// - Login, exchanging credentials for a bearer token
/// - Resolving a bearer token back to its user
pub struct AuthService<U: UserRepository> {
    hasher: PasswordHasher,
    tokens: TokenService,
    user_repo: Arc<U>,
}

impl<U: UserRepository> AuthService<U> {
    /// Create a new auth service using the system clock
    pub fn new(config: &AuthConfig, user_repo: Arc<U>) -> Result<Self, AuthError> {
        Self::with_clock(config, user_repo, Arc::new(SystemClock))
    }

    /// Create a new auth service with an explicit time source
    pub fn with_clock(
        config: &AuthConfig,
        user_repo: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            hasher: PasswordHasher::new(config.password)?,
            tokens: TokenService::new(config, clock)?,
            user_repo,
        })
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Register a new account.
    ///
    /// A duplicate email surfaces as [`AuthError::Constraint`].
    pub async fn register(&self, email: &str, password: &str) -> Result<UserRow, AuthError> {
        let email = normalize_email(email);
        let password_hash = self.hasher.hash(password)?;

        let user = self
            .user_repo
            .create(CreateUser {
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "Registered user");
        Ok(user)
    }

    /// Exchange email and password for an access token
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            self.hasher.verify_dummy(password);
            tracing::warn!("Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            tracing::warn!(user_id = user.id, "Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        if self.hasher.needs_rehash(&user.password_hash) {
            self.upgrade_hash(&user, password).await;
        }

        let issued = self.tokens.issue(&Subject::from(user.user_id()))?;
        tracing::debug!(user_id = user.id, expires_at = %issued.expires_at, "Issued access token");
        Ok(issued.into_access_token())
    }

    /// Resolve a bearer token to the user it was issued for
    pub async fn authenticate(&self, token: &str) -> Result<UserRow, AuthError> {
        let subject = self.tokens.verify(token)?;

        let user_id = subject.user_id().ok_or_else(|| {
            tracing::debug!(subject = %subject, "Token subject is not a user id");
            AuthError::TokenInvalid
        })?;

        self.user_repo.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::debug!(%user_id, "Token subject no longer exists");
            AuthError::TokenInvalid
        })
    }

    // =========================================================================
    // User Management
    // =========================================================================

    /// Delete a user and everything it owns.
    ///
    /// Returns `false` if there was no such user.
    pub async fn delete_user(&self, user_id: UserId) -> Result<bool, AuthError> {
        let deleted = self.user_repo.delete(user_id).await?;
        if deleted {
            tracing::info!(%user_id, "Deleted user and owned resources");
        } else {
            tracing::info!(%user_id, "No user to delete");
        }
        Ok(deleted)
    }

    /// Replace a stale hash after a successful login; failures only cost the upgrade
    async fn upgrade_hash(&self, user: &UserRow, password: &str) {
        let result = match self.hasher.hash(password) {
            Ok(hash) => self
                .user_repo
                .update_password_hash(user.user_id(), &hash)
                .await
                .map_err(AuthError::from),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => tracing::info!(user_id = user.id, "Upgraded password hash"),
            Err(e) => tracing::warn!(user_id = user.id, "Password hash upgrade failed: {}", e),
        }
    }
}

impl<U: UserRepository> std::fmt::Debug for AuthService<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
