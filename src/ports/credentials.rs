//! Password hashing and session token issuance ports.

use secrecy::SecretString;

use crate::domain::foundation::{AuthError, AuthenticatedUser, DomainError, Timestamp};

/// One-way password hashing.
///
/// Implementations are CPU-bound; async callers should run them on a
/// blocking thread.
pub trait PasswordHasher: Send + Sync {
    /// Hash a password into a self-describing string (salt included).
    fn hash(&self, password: &SecretString) -> Result<String, DomainError>;

    /// Check a password against a stored hash.
    ///
    /// Returns `Ok(false)` for a mismatch; `Err` only for unreadable hashes.
    fn verify(&self, password: &SecretString, hash: &str) -> Result<bool, DomainError>;
}

/// A freshly signed session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Signs session tokens for authenticated users.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &AuthenticatedUser, now: Timestamp) -> Result<IssuedToken, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_ports_are_object_safe() {
        fn _hasher(_h: &dyn PasswordHasher) {}
        fn _issuer(_i: &dyn TokenIssuer) {}
    }
}
