//! User account entity and signup input.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

use super::EmailAddress;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    /// Unique across accounts.
    pub email: EmailAddress,
    /// PHC-formatted password hash; never the password itself.
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// Validated signup input.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: EmailAddress,
    pub password: SecretString,
}

impl Registration {
    pub fn new(name: &str, email: &str, password: SecretString) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        let email = EmailAddress::parse(email)?;

        let length = password.expose_secret().chars().count();
        if length == 0 {
            return Err(ValidationError::empty_field("password"));
        }
        if length < MIN_PASSWORD_LEN {
            return Err(ValidationError::too_short("password", MIN_PASSWORD_LEN, length));
        }

        Ok(Self {
            name: name.to_string(),
            email,
            password,
        })
    }
}
