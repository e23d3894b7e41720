//! HS256 session tokens.
//!
//! Implements both sides of the session: `TokenIssuer` signs a token at
//! sign-in and `SessionValidator` checks it on every protected request.
//!
//! Claims: `sub` (user id), `email`, `iss`, `iat`, `exp`. Expiry is checked
//! against the injected `Clock`, not the library's wall-clock check.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Clock, Timestamp, UserId};
use crate::ports::{IssuedToken, SessionValidator, TokenIssuer};

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    email: String,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Signs and validates session JWTs with a shared secret.
pub struct JwtSessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
    issuer: String,
    clock: Arc<dyn Clock>,
}

impl JwtSessionService {
    pub fn new(
        secret: SecretString,
        ttl_secs: u64,
        issuer: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl_secs,
            issuer: issuer.into(),
            clock,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["sub", "exp", "iss"]);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation
    }
}

impl TokenIssuer for JwtSessionService {
    fn issue(&self, user: &AuthenticatedUser, now: Timestamp) -> Result<IssuedToken, AuthError> {
        let ttl = i64::try_from(self.ttl_secs)
            .map_err(|_| AuthError::service_unavailable("token ttl out of range"))?;
        let iat = now.as_unix_secs();
        let exp = iat + ttl;

        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iss: self.issuer.clone(),
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to sign session token");
                AuthError::service_unavailable(format!("token signing failed: {}", e))
            })?;

        Ok(IssuedToken {
            token,
            expires_at: now.plus(chrono::Duration::seconds(ttl)),
        })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionService {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| {
                tracing::debug!(error = %e, "session token rejected");
                AuthError::InvalidToken
            })?;
        let claims = data.claims;

        if claims.exp <= self.clock.now().as_unix_secs() {
            return Err(AuthError::TokenExpired);
        }

        let id = UserId::parse(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, claims.email))
    }
}
