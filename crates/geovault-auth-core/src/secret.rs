//! Shared signing secret

use std::sync::Arc;

use crate::AuthError;

/// Validated HMAC signing secret.
///
/// The key bytes are never printed; `Debug` only reports the length.
#[derive(Clone)]
pub struct SecretKey {
    key_bytes: Arc<[u8]>,
}

impl SecretKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a secret key from bytes.
    ///
    /// # Errors
    /// Returns error if key is too short (less than 32 bytes).
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, SecretKeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(SecretKeyError::KeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key_bytes
    }

    pub fn len(&self) -> usize {
        self.key_bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_bytes.is_empty()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating a secret key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecretKeyError {
    #[error("secret key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}

impl From<SecretKeyError> for AuthError {
    fn from(err: SecretKeyError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_too_short() {
        let result = SecretKey::new("short");
        assert_eq!(
            result.unwrap_err(),
            SecretKeyError::KeyTooShort {
                actual: 5,
                minimum: 32
            }
        );
    }

    #[test]
    fn test_secret_key_minimum_length() {
        assert!(SecretKey::new("k".repeat(31)).is_err());
        let key = SecretKey::new("k".repeat(32)).unwrap();
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = SecretKey::new("super-secret-signing-key-0123456789").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("key_length"));
    }
}
