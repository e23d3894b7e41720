//! Argon2id password hashing.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PasswordHasher;

/// Hashes passwords into PHC strings (`$argon2id$v=19$...`).
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Library default parameters (19 MiB, 2 passes).
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Minimal-cost parameters so test suites stay fast. Never use in production.
    pub fn for_tests() -> Self {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &SecretString) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        self.argon2
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("hashing failed: {}", e)))
    }

    fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("unreadable password hash: {}", e))
        })?;

        Ok(self
            .argon2
            .verify_password(password.expose_secret().as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string())
    }

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hasher = Argon2PasswordHasher::for_tests();
        let hash = hasher.hash(&secret("hunter22")).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&secret("hunter22"), &hash).unwrap());
        assert!(!hasher.verify(&secret("hunter23"), &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = Argon2PasswordHasher::for_tests();
        let a = hasher.hash(&secret("hunter22")).unwrap();
        let b = hasher.hash(&secret("hunter22")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_an_error() {
        let hasher = Argon2PasswordHasher::for_tests();
        assert!(hasher.verify(&secret("x"), "not-a-phc-string").is_err());
    }
}
