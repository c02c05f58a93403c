//! Salted, adaptive password hashing
//!
//! New hashes are Argon2id PHC strings. Hashes written by the previous
//! deployment are bcrypt (`$2a$`, `$2b$`, `$2y$`); they still verify, and
//! [`PasswordHasher::needs_rehash`] flags them so the login path can
//! replace them.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::{AuthError, PasswordConfig};

const DUMMY_PASSWORD: &str = "geovault-timing-equalization";

/// Argon2id hasher with fixed cost parameters
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    params: Params,
    /// Verified against when the account does not exist
    dummy_hash: String,
}

impl PasswordHasher {
    /// Create a hasher.
    ///
    /// # Errors
    /// Returns `Configuration` if the cost parameters are out of range.
    pub fn new(config: PasswordConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AuthError::Configuration(format!("invalid argon2 parameters: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone());

        let mut hasher = Self {
            argon2,
            params,
            dummy_hash: String::new(),
        };
        hasher.dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(hasher)
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        use argon2::password_hash::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                AuthError::Internal("password hashing failed".to_string())
            })
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Malformed or unsupported hashes never match.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        if is_bcrypt(hash) {
            return bcrypt::verify(plaintext, hash).unwrap_or_else(|e| {
                tracing::debug!("Malformed bcrypt hash: {}", e);
                false
            });
        }

        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Malformed password hash: {}", e);
                return false;
            }
        };
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(password_hash::Error::Password) => false,
            Err(e) => {
                tracing::debug!("Password hash not verifiable: {}", e);
                false
            }
        }
    }

    /// Spend the same work as a real verification, for accounts that do not exist
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.dummy_hash);
    }

    /// Whether a stored hash should be replaced by one with the current parameters
    pub fn needs_rehash(&self, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return true;
        };
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        if parsed.version != Some(Version::V0x13.into()) {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(stored) => {
                stored.m_cost() != self.params.m_cost()
                    || stored.t_cost() != self.params.t_cost()
                    || stored.p_cost() != self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish_non_exhaustive()
    }
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"].iter().any(|p| hash.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash));
        assert!(!hasher.verify("battery staple", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = fast_hasher();
        let a = hasher.hash("same password").unwrap();
        let b = hasher.hash("same password").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("same password", &a));
        assert!(hasher.verify("same password", &b));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        let hasher = fast_hasher();
        for garbage in ["", "plaintext", "$argon2id$broken", "$2b$12$short", "$md5$abc"] {
            assert!(!hasher.verify("anything", garbage), "{garbage:?} verified");
        }
    }

    #[test]
    fn test_legacy_bcrypt_hash() {
        let hasher = fast_hasher();
        let legacy = bcrypt::hash("old password", 4).unwrap();
        assert!(hasher.verify("old password", &legacy));
        assert!(!hasher.verify("new password", &legacy));
        assert!(hasher.needs_rehash(&legacy));
    }

    #[test]
    fn test_needs_rehash_on_parameter_change() {
        let hasher = fast_hasher();
        let hash = hasher.hash("pw").unwrap();
        assert!(!hasher.needs_rehash(&hash));

        let stronger = PasswordHasher::new(PasswordConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(stronger.needs_rehash(&hash));
        // old parameters are embedded in the hash, so it still verifies
        assert!(stronger.verify("pw", &hash));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let result = PasswordHasher::new(PasswordConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_debug_hides_dummy_hash() {
        let hasher = fast_hasher();
        assert!(!format!("{hasher:?}").contains("$argon2id$"));
    }
}
