//! Authentication configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Minimum HS256 secret length in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Session token configuration
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,

    /// Session lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// `iss` claim written and required on tokens
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl AuthConfig {
    pub fn jwt_secret(&self) -> SecretString {
        SecretString::new(self.jwt_secret.clone())
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort(MIN_JWT_SECRET_LEN));
        }
        if !(60..=7 * 24 * 3600).contains(&self.token_ttl_secs) {
            return Err(ValidationError::InvalidTokenTtl);
        }
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            issuer: default_issuer(),
        }
    }
}

fn default_token_ttl() -> u64 {
    3600
}

fn default_issuer() -> String {
    "flora-backend".to_string()
}
