//! Session validation port.
//!
//! HTTP middleware hands the raw bearer credential to this port and gets back
//! the caller's identity. Implementations decide how tokens are encoded.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates session tokens and extracts user identity.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed tokens or bad signatures
/// - `AuthError::TokenExpired` for well-signed but expired tokens
/// - `AuthError::ServiceUnavailable` when validation itself cannot run
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a token (without any "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
