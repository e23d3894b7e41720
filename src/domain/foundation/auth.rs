//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is what the HTTP middleware injects into request
//! extensions once a session token has been validated through the
//! `SessionValidator` port. Nothing here knows how tokens are encoded.

use super::UserId;
use thiserror::Error;

/// Caller identity extracted from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account id, carried as the token subject.
    pub id: UserId,

    /// Email address at the time the token was issued.
    pub email: String,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential was presented.
    #[error("No token, authorization denied")]
    MissingToken,

    /// The token is malformed or has an invalid signature.
    #[error("Token is not valid")]
    InvalidToken,

    /// The token was well-formed but is past its expiry.
    #[error("Token expired")]
    TokenExpired,

    /// The token could not be produced or checked (signing key, clock).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the client should sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::TokenExpired
        )
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
