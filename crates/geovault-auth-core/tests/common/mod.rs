//! Common test utilities for geovault-auth-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::MockStore;

use geovault_auth_core::{AuthConfig, PasswordConfig};

#[allow(dead_code)]
pub const TEST_SECRET: &str = "integration-test-secret-key-0123456789";

/// Config with cheap hashing parameters so tests stay fast
#[allow(dead_code)]
pub fn test_config() -> AuthConfig {
    AuthConfig::try_new(TEST_SECRET, "HS256")
        .unwrap()
        .with_password_config(fast_password_config())
}

#[allow(dead_code)]
pub fn fast_password_config() -> PasswordConfig {
    PasswordConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}
